use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::DataUriError;

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decodes a `data:<mime>;base64,<payload>` URI as produced by
/// `HTMLCanvasElement.toDataURL`.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, DataUriError> {
    let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;

    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(DataUriError::NotBase64)?
        .to_string();

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUriError::Decode(e.to_string()))?;

    Ok(DecodedImage { mime_type, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_jpeg_data_uri() {
        let encoded = STANDARD.encode([0xFFu8, 0xD8, 0xFF, 0xE0]);
        let uri = format!("data:image/jpeg;base64,{}", encoded);

        let decoded = decode_data_uri(&uri).unwrap();
        assert_eq!(decoded.mime_type, "image/jpeg");
        assert_eq!(decoded.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_rejects_plain_strings() {
        assert_eq!(
            decode_data_uri("image/jpeg;base64,AAAA"),
            Err(DataUriError::MissingScheme)
        );
        assert_eq!(
            decode_data_uri("data:image/jpeg;base64"),
            Err(DataUriError::MissingPayload)
        );
    }

    #[test]
    fn test_rejects_non_base64_payloads() {
        assert_eq!(
            decode_data_uri("data:text/plain,hello"),
            Err(DataUriError::NotBase64)
        );
        assert!(matches!(
            decode_data_uri("data:image/jpeg;base64,***"),
            Err(DataUriError::Decode(_))
        ));
    }
}
