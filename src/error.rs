//! Error types for the DTMF player.
//!
//! Defines the error codes and the error type shared by the encoder,
//! the tone builder and the device binding orchestrator.

use std::fmt;
use std::sync::Arc;

/// Error codes identifying why an operation failed.
///
/// Initialization failures carry one of these codes so callers can tell a
/// missing device apart from a rejected binding without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// No output device label contains the configured name mask.
    /// Trigger: mask matches nothing and default-device fallback is off.
    DeviceNotFound,

    /// The host rejected routing a tone element to the selected device.
    DeviceBindFailed,

    /// A single device binding did not complete within the bind timeout.
    DeviceBindTimeout,

    /// The host refused access to audio devices.
    PermissionDenied,

    /// The host failed to list its media devices.
    EnumerationFailed,

    /// The host cannot route playback elements to a chosen output device.
    SinkSelectionUnsupported,

    /// A previous initialization was dropped before it finished.
    InitAbandoned,

    /// Configuration values are out of range.
    InvalidConfig,

    /// Samples could not be encoded into a waveform asset.
    EncodeFailed,

    /// Reading or writing a file failed.
    Io,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DeviceNotFound => "DEVICE_NOT_FOUND",
            ErrorCode::DeviceBindFailed => "DEVICE_BIND_FAILED",
            ErrorCode::DeviceBindTimeout => "DEVICE_BIND_TIMEOUT",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::EnumerationFailed => "ENUMERATION_FAILED",
            ErrorCode::SinkSelectionUnsupported => "SINK_SELECTION_UNSUPPORTED",
            ErrorCode::InitAbandoned => "INIT_ABANDONED",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::EncodeFailed => "ENCODE_FAILED",
            ErrorCode::Io => "IO",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::DeviceNotFound => "No audio output device matches the name mask",
            ErrorCode::DeviceBindFailed => "Binding a tone to the output device failed",
            ErrorCode::DeviceBindTimeout => "Binding a tone to the output device timed out",
            ErrorCode::PermissionDenied => "Access to audio devices was denied",
            ErrorCode::EnumerationFailed => "Listing audio devices failed",
            ErrorCode::SinkSelectionUnsupported => "Output device selection is not supported",
            ErrorCode::InitAbandoned => "Initialization was cancelled part way through",
            ErrorCode::InvalidConfig => "Configuration values are out of range",
            ErrorCode::EncodeFailed => "Encoding samples to WAV failed",
            ErrorCode::Io => "File input/output failed",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::DeviceNotFound => {
                "Check the device name mask against the enumerated output labels, \
                 or enable devUseDefault to fall back to the default device"
            }
            ErrorCode::DeviceBindFailed => {
                "Verify the output device is still connected and that the host allows \
                 selecting it (firefox: media.setsinkid.enabled=true)"
            }
            ErrorCode::DeviceBindTimeout => {
                "The host did not answer the device selection request; retry, \
                 or raise bindTimeoutMs"
            }
            ErrorCode::PermissionDenied => {
                "Grant microphone/audio permission; a secure context (https or localhost) \
                 is required"
            }
            ErrorCode::EnumerationFailed => "Retry after granting audio permission",
            ErrorCode::SinkSelectionUnsupported => {
                "Use a host that supports selecting the output device of an audio element"
            }
            ErrorCode::InitAbandoned => {
                "Create a new player; this one may hold a partial device binding"
            }
            ErrorCode::InvalidConfig => {
                "Tone durations must be positive and toneDuration2 must not exceed \
                 toneDuration; gains must be within 0-1"
            }
            ErrorCode::EncodeFailed => "Check the sample rate and sample buffers",
            ErrorCode::Io => "Check that the path exists and is writable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for player operations.
///
/// Cloneable so a single initialization outcome can be handed to every
/// caller that awaited it.
#[derive(Debug, Clone)]
pub struct DtmfError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl DtmfError {
    /// Creates a new DtmfError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new DtmfError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a DEVICE_NOT_FOUND error.
    pub fn device_not_found(mask: &str) -> Self {
        Self::new(
            ErrorCode::DeviceNotFound,
            format!("output device not found for mask: {}", mask),
        )
    }

    /// Creates a DEVICE_BIND_FAILED error naming the tone symbol.
    pub fn bind_failed(symbol: char, cause: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::DeviceBindFailed,
            format!("setSinkId failed ({}): {}", symbol, cause),
        )
    }

    /// Creates a DEVICE_BIND_TIMEOUT error naming the tone symbol.
    pub fn bind_timeout(symbol: char, timeout_ms: u64) -> Self {
        Self::new(
            ErrorCode::DeviceBindTimeout,
            format!("setSinkId timed out ({}) after {} ms", symbol, timeout_ms),
        )
    }

    /// Creates a PERMISSION_DENIED error.
    pub fn permission_denied(cause: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::PermissionDenied,
            format!("init failed: {}", cause),
        )
    }

    /// Creates an ENUMERATION_FAILED error.
    pub fn enumeration_failed(cause: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::EnumerationFailed,
            format!("init failed: {}", cause),
        )
    }

    /// Creates a SINK_SELECTION_UNSUPPORTED error.
    pub fn sink_selection_unsupported() -> Self {
        Self::new(ErrorCode::SinkSelectionUnsupported, "setSinkId not supported")
    }

    /// Creates an INIT_ABANDONED error.
    pub fn init_abandoned() -> Self {
        Self::new(
            ErrorCode::InitAbandoned,
            "init failed: a previous init was dropped before completing",
        )
    }

    /// Creates an INVALID_CONFIG error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidConfig,
            format!("Invalid configuration: {}", reason.into()),
        )
    }

    /// Creates an ENCODE_FAILED error.
    pub fn encode_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::EncodeFailed,
            format!("Failed to encode WAV: {}", reason.into()),
        )
    }

    /// Creates an IO error carrying the underlying cause.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::with_source(ErrorCode::Io, context, source)
    }
}

impl fmt::Display for DtmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for DtmfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using DtmfError.
pub type Result<T> = std::result::Result<T, DtmfError>;
