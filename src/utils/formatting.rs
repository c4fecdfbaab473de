pub fn format_duration(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

/// One-decimal percentage as shown in every summary line.
pub fn format_percentage(pct: f64) -> String {
    format!("{:.1}%", pct)
}

pub fn format_bytes(len: usize) -> String {
    if len < 1024 {
        format!("{} bytes", len)
    } else if len < 1024 * 1024 {
        format!("{:.1} KiB", len as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", len as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(250), "250ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    #[test]
    fn test_format_percentage_one_decimal() {
        assert_eq!(format_percentage(94.94), "94.9%");
        assert_eq!(format_percentage(100.0), "100.0%");
        assert_eq!(format_percentage(0.0), "0.0%");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(44), "44 bytes");
        assert_eq!(format_bytes(2048), "2.0 KiB");
    }
}
