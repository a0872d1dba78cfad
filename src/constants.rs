//! Cross-cutting, shared constants.
//!
//! The CLIP preprocessing values are fixed by the pretrained checkpoint; changing
//! them silently degrades scores rather than failing.

/// Number of candidate descriptions scored per request (specific, general).
pub const CANDIDATE_COUNT: usize = 2;

/// Index of the specific description within a candidate list.
pub const SPECIFIC_INDEX: usize = 0;

/// Index of the general description within a candidate list.
pub const GENERAL_INDEX: usize = 1;

/// Input resolution of CLIP ViT-B/32.
pub const CLIP_IMAGE_SIZE: usize = 224;

/// Max text tokens (CLIP position embeddings).
pub const CLIP_MAX_SEQ_LEN: usize = 77;

/// Token used to pad text sequences to a common length.
pub const CLIP_PAD_TOKEN: &str = "<|endoftext|>";

/// Per-channel RGB mean used by the OpenAI CLIP image processor.
pub const CLIP_IMAGE_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];

/// Per-channel RGB std used by the OpenAI CLIP image processor.
pub const CLIP_IMAGE_STD: [f32; 3] = [0.268_629_54, 0.261_302_6, 0.275_777_1];

/// Learned logit scale of released CLIP checkpoints (`exp(4.6052)`).
pub const CLIP_LOGIT_SCALE: f32 = 100.0;

/// Response header carrying a short machine-readable outcome.
pub const PRISM_STATUS_HEADER: &str = "x-prism-status";
pub const PRISM_STATUS_OK: &str = "ok";
pub const PRISM_STATUS_READY: &str = "ready";
pub const PRISM_STATUS_INVALID_REQUEST: &str = "invalid_request";
pub const PRISM_STATUS_UNDECODABLE_IMAGE: &str = "undecodable_image";
pub const PRISM_STATUS_INFERENCE_ERROR: &str = "inference_error";

/// Multipart field names accepted by `POST /analyze`.
pub const FIELD_IMAGE: &str = "image";
pub const FIELD_SPECIFIC_DESCRIPTION: &str = "specific_description";
pub const FIELD_GENERAL_DESCRIPTION: &str = "general_description";

/// Error text returned when a required multipart field is absent.
pub const MISSING_DATA_MESSAGE: &str = "invalid request, missing data";
