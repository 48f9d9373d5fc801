use napi::Result as NapiResult;
use napi_derive::napi;

use projection_core::calculators::{sip, step_up, swp};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Calculators
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_sip(input_json: String) -> NapiResult<String> {
    let input: sip::SipInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = sip::compute_sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_swp(input_json: String) -> NapiResult<String> {
    let input: swp::SwpInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = swp::compute_swp(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_step_up_sip(input_json: String) -> NapiResult<String> {
    let input: step_up::StepUpSipInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = step_up::compute_step_up_sip(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
