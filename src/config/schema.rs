use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "target": {
                "type": "object",
                "properties": {
                    "url": { "type": "string", "pattern": "^https?://" },
                    "liveness_path": { "type": "string", "pattern": "^/" },
                    "liveness_timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "legacy": {
                "type": "object",
                "properties": {
                    "prefix": { "type": "string" },
                    "narrator": { "type": "string", "minLength": 1 },
                    "emotion": { "type": "string", "minLength": 1 },
                    "sample_text": { "type": "string", "minLength": 1 }
                }
            },
            "compat": {
                "type": "object",
                "properties": {
                    "default_speaker": { "type": "integer" },
                    "probe_speaker": { "type": "integer" },
                    "sample_text": { "type": "string", "minLength": 1 }
                }
            },
            "pacing": {
                "type": "object",
                "properties": {
                    "basic_ms": { "type": "integer", "minimum": 0 },
                    "attack_ms": { "type": "integer", "minimum": 0 },
                    "burst_ms": { "type": "integer", "minimum": 0 },
                    "sweep_ms": { "type": "integer", "minimum": 0 }
                }
            },
            "scoring": {
                "type": "object",
                "properties": {
                    "rate_limit_counts_as_pass": { "type": "boolean" },
                    "require_client_error": { "type": "boolean" },
                    "burst_size": { "type": "integer", "minimum": 1 },
                    "expected_totals": {
                        "type": "object",
                        "propertyNames": { "$ref": "#/$defs/category" },
                        "additionalProperties": { "type": "integer", "minimum": 0 }
                    }
                }
            },
            "container": {
                "type": "object",
                "properties": {
                    "name": { "type": "string", "minLength": 1 }
                }
            },
            "artifacts": {
                "type": "object",
                "properties": {
                    "enabled": { "type": "boolean" },
                    "directory": { "type": "string" }
                }
            },
            "security": {
                "type": "object",
                "properties": {
                    "port": { "type": ["integer", "null"], "minimum": 1, "maximum": 65535 },
                    "transport": { "$ref": "#/$defs/transport" },
                    "comprehensive": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["port", "transport"],
                            "properties": {
                                "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                                "transport": { "$ref": "#/$defs/transport" }
                            }
                        }
                    }
                }
            }
        },
        "$defs": {
            "transport": { "type": "string", "enum": ["direct", "container"] },
            "category": {
                "type": "string",
                "enum": [
                    "basic_functionality",
                    "injection_attacks",
                    "xss_attacks",
                    "input_validation",
                    "numeric_attacks",
                    "rate_limiting"
                ]
            }
        }
    })
});
