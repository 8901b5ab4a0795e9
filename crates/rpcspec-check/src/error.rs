//! # Check Errors
//!
//! Every variant terminates the run. Each carries enough context (round
//! trip, method, parameter index) to find the offending fixture without
//! re-running.

use rpcspec_schema::Violation;
use thiserror::Error;

fn url_suffix(debug_url: &Option<String>) -> String {
    match debug_url {
        Some(url) => format!("\nURL: {url}"),
        None => String::new(),
    }
}

/// The single failure a check run reports.
#[derive(Error, Debug, Clone)]
pub enum CheckError {
    /// A round trip names a method the specification does not declare.
    #[error("undefined method: {method}")]
    UndefinedMethod {
        /// The unresolved method name.
        method: String,
    },

    /// A round trip supplies more parameters than the method declares.
    #[error("{method}: too many parameters (supplied {supplied}, declared {declared})")]
    TooManyParameters {
        /// The method name.
        method: String,
        /// Number of values the round trip supplied.
        supplied: usize,
        /// Number of parameters the method declares.
        declared: usize,
    },

    /// A required parameter was not supplied.
    #[error("missing required parameter {method}.param[{index}]")]
    MissingRequiredParameter {
        /// The method name.
        method: String,
        /// Position of the missing parameter.
        index: usize,
    },

    /// A supplied parameter does not conform to its schema.
    #[error(
        "unable to validate parameter in {round_trip}: {method}.param[{index}]\n{violation}{}",
        url_suffix(.debug_url)
    )]
    ParameterValidation {
        /// The round trip name.
        round_trip: String,
        /// The method name.
        method: String,
        /// Position of the parameter.
        index: usize,
        /// The first violation found.
        violation: Violation,
        /// Debugger link, when requested.
        debug_url: Option<String>,
    },

    /// The recorded result does not conform to the result schema.
    #[error(
        "invalid result {round_trip}: {method}.result\n{violation}{}",
        url_suffix(.debug_url)
    )]
    ResultValidation {
        /// The round trip name.
        round_trip: String,
        /// The method name.
        method: String,
        /// The first violation found.
        violation: Violation,
        /// Debugger link, when requested.
        debug_url: Option<String>,
    },

    /// The response has neither a result nor an error.
    #[error("missing result in {round_trip}: response to {method} has no result or error")]
    MissingResult {
        /// The round trip name.
        round_trip: String,
        /// The method name.
        method: String,
    },

    /// A declared schema is not a valid JSON-Schema document.
    #[error("schema compile error for {context}: {reason}")]
    SchemaCompile {
        /// Schema namespace, e.g. `eth_call.param[0]`.
        context: String,
        /// Reason compilation failed.
        reason: String,
    },

    /// A declared schema could not be serialized.
    #[error("unable to marshal schema for {context} to json: {reason}")]
    SchemaMarshal {
        /// Schema namespace.
        context: String,
        /// Reason serialization failed.
        reason: String,
    },

    /// A recorded value is not well-formed JSON.
    #[error("malformed value in {round_trip} for {context}: {reason}")]
    MalformedInstance {
        /// The round trip name.
        round_trip: String,
        /// Schema namespace the value was to be checked against.
        context: String,
        /// Reason decoding failed.
        reason: String,
    },
}

impl CheckError {
    /// The debugger link attached to a validation failure, if any.
    pub fn debug_url(&self) -> Option<&str> {
        match self {
            Self::ParameterValidation { debug_url, .. } | Self::ResultValidation { debug_url, .. } => {
                debug_url.as_deref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation() -> Violation {
        Violation {
            instance_path: String::new(),
            schema_path: "/type".to_string(),
            message: r#""two" is not of type "integer""#.to_string(),
        }
    }

    #[test]
    fn parameter_error_names_round_trip_method_and_index() {
        let err = CheckError::ParameterValidation {
            round_trip: "sum/sum-string".to_string(),
            method: "sum".to_string(),
            index: 1,
            violation: violation(),
            debug_url: None,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("unable to validate parameter in sum/sum-string: sum.param[1]"));
        assert!(!msg.contains("URL:"));
        assert!(err.debug_url().is_none());
    }

    #[test]
    fn debug_url_is_appended() {
        let err = CheckError::ResultValidation {
            round_trip: "sum/sum-simple".to_string(),
            method: "sum".to_string(),
            violation: violation(),
            debug_url: Some("http://localhost:5173/#schema=x&data=y".to_string()),
        };
        assert!(err
            .to_string()
            .ends_with("\nURL: http://localhost:5173/#schema=x&data=y"));
        assert_eq!(err.debug_url(), Some("http://localhost:5173/#schema=x&data=y"));
    }

    #[test]
    fn structural_errors_display() {
        let err = CheckError::TooManyParameters {
            method: "sum".to_string(),
            supplied: 3,
            declared: 2,
        };
        assert_eq!(err.to_string(), "sum: too many parameters (supplied 3, declared 2)");

        let err = CheckError::MissingRequiredParameter {
            method: "sum".to_string(),
            index: 1,
        };
        assert_eq!(err.to_string(), "missing required parameter sum.param[1]");
    }
}
