//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use case_export::domain::case::CaseExport;

/// A braking-system case: nested goals, linked evidence, a comment and a
/// sandbox draft.
pub const CASE_JSON: &str = r##"{
    "version": "1.0",
    "exportedAt": "2024-06-15T10:30:00Z",
    "case": {
        "name": "Brake System",
        "description": "Safety case for the brake controller"
    },
    "tree": {
        "id": 1,
        "type": "GOAL",
        "name": "G1",
        "description": "The braking system is acceptably safe",
        "comments": [
            {"author": "alice", "content": "Add operating context", "createdAt": "2024-03-01T09:00:00Z"}
        ],
        "children": [
            {"id": 2, "type": "CONTEXT", "name": "C1", "description": "Urban driving"},
            {
                "id": 3,
                "type": "STRATEGY",
                "name": "S1",
                "description": "Argue over each hazard",
                "children": [
                    {
                        "id": 4,
                        "type": "PROPERTY_CLAIM",
                        "name": "P1",
                        "description": "Stopping distance is within limits",
                        "children": [
                            {
                                "id": 5,
                                "type": "EVIDENCE",
                                "name": "E1",
                                "description": "Brake test report",
                                "url": "https://example.com/brake-test"
                            }
                        ]
                    }
                ]
            },
            {"id": 6, "type": "PROPERTY_CLAIM", "name": "Draft", "inSandbox": true}
        ]
    }
}"##;

pub fn sample_case() -> CaseExport {
    CaseExport::from_json(CASE_JSON).expect("fixture parses")
}

/// A solid `width` x `height` PNG as a `data:` URL.
pub fn png_data_url(width: u32, height: u32) -> String {
    let image = RgbaImage::from_pixel(width, height, Rgba([30, 90, 200, 255]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(image)
        .write_to(&mut out, ImageFormat::Png)
        .expect("png encodes");
    format!("data:image/png;base64,{}", BASE64.encode(out.into_inner()))
}
