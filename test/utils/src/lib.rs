use std::io::Cursor;

use image::ImageOutputFormat;
use image::Rgba;
use image::RgbaImage;

/// Encodes a solid colour PNG of the given size.
pub fn png_fixture(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes: Vec<u8> = vec![];
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .unwrap();

    return bytes;
}

/// Gemini `generateContent` body with a leading text part followed by one
/// inline image.
pub fn gemini_image_response_fixture(mime_type: &str, data: &str) -> String {
    return format!(
        r#"{{
  "candidates": [
    {{
      "content": {{
        "role": "model",
        "parts": [
          {{ "text": "Here is your edited image." }},
          {{ "inlineData": {{ "mimeType": "{mime_type}", "data": "{data}" }} }}
        ]
      }},
      "finishReason": "STOP",
      "index": 0
    }}
  ],
  "usageMetadata": {{ "promptTokenCount": 1290, "totalTokenCount": 2580 }}
}}"#
    );
}

pub fn gemini_text_only_response_fixture() -> &'static str {
    return r#"{
  "candidates": [
    {
      "content": {
        "role": "model",
        "parts": [
          { "text": "I can't help with editing this image." }
        ]
      },
      "finishReason": "STOP",
      "index": 0
    }
  ]
}"#;
}
