use gloo_net::http::Request;
use js_sys::{Array, Uint8Array};
use shared::{
    CAPTURE_FILE_NAME, EMOTION_FIELD, IMAGE_FIELD, PredictionResponse, SubmitError, UPLOAD_PATH,
    UploadRequest,
};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

/// Posts one capture to the relay and decodes its prediction body.
pub async fn submit_for_analysis(
    request: UploadRequest,
) -> Result<PredictionResponse, SubmitError> {
    let form_data = build_form_data(&request)?;
    log::info!(
        "Submitting {} byte image for {:?}",
        request.image.len(),
        request.emotion
    );

    let response = Request::post(UPLOAD_PATH)
        .body(form_data)
        .map_err(|e| SubmitError::Request(e.to_string()))?
        .send()
        .await
        .map_err(|e| SubmitError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::error!("Relay error: {} - {}", status, body);
        return Err(SubmitError::Rejected(status));
    }

    response
        .json::<PredictionResponse>()
        .await
        .map_err(|e| SubmitError::Decode(e.to_string()))
}

fn build_form_data(request: &UploadRequest) -> Result<FormData, SubmitError> {
    let to_err = |e: JsValue| SubmitError::Request(format!("{:?}", e));

    let bytes = Uint8Array::from(request.image.as_slice());
    let parts = Array::new();
    parts.push(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&request.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(to_err)?;

    let form_data = FormData::new().map_err(to_err)?;
    form_data
        .append_with_blob_and_filename(IMAGE_FIELD, &blob, CAPTURE_FILE_NAME)
        .map_err(to_err)?;
    form_data
        .append_with_str(EMOTION_FIELD, &request.emotion)
        .map_err(to_err)?;
    Ok(form_data)
}
