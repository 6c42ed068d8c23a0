//! JSON layout report and C ABI tests.

use std::ffi::{CStr, CString};

use pretty_assertions::assert_eq;
use scoreflow::{layout_json, scoreflow_free_string, scoreflow_layout_json, FlowError};
use serde_json::Value;

const REQUEST: &str = r#"{
    "config": {
        "paper": {"width": 612.0, "height": 792.0,
                  "margin_top": 72.0, "margin_right": 72.0,
                  "margin_bottom": 72.0, "margin_left": 72.0},
        "display_gap": 0.0,
        "line_margin": 18.0,
        "break_threshold": 10.0
    },
    "flows": [
        {"length": 1000.0, "height": 100.0},
        {"page": 1, "pos": {"x": 0.0, "y": 500.0}, "length": 500.0, "height": 100.0,
         "break_hints": [462.0], "margins": [{"flow_x": 0.0, "margin_left": 12.0}]}
    ]
}"#;

#[test]
fn report_lists_lines_for_every_flow() {
    let json = layout_json(REQUEST).unwrap();
    let report: Value = serde_json::from_str(&json).unwrap();

    let flows = report["flows"].as_array().unwrap();
    assert_eq!(flows.len(), 2);

    // Letter with 1in margins: 468pt wide, 648pt tall.
    let first: Vec<f64> = flows[0]["lines"]
        .as_array()
        .unwrap()
        .iter()
        .map(|line| line["flow_x"].as_f64().unwrap())
        .collect();
    assert_eq!(first, vec![0.0, 468.0, 936.0]);
    assert_eq!(flows[0]["lines"][1]["pos"]["y"].as_f64(), Some(118.0));
    assert_eq!(flows[0]["lines"][1]["margin_before_next"].as_f64(), Some(18.0));
    assert_eq!(flows[0]["lines"][0]["margin_before_next"].as_f64(), Some(0.0));

    // Second flow: the margin shortens its first line to 456pt, which puts
    // the hint at 462pt out of reach, so the line ends at 456pt.
    let second = flows[1]["lines"].as_array().unwrap();
    assert_eq!(second[0]["length"].as_f64(), Some(456.0));
    assert_eq!(second[0]["page_index"].as_u64(), Some(1));
    // The next line would end below the live area, so it moves to page 2.
    assert_eq!(second[1]["page_index"].as_u64(), Some(2));
    assert_eq!(second[1]["canvas"]["x"].as_f64(), Some(2.0 * 612.0 + 12.0));
    assert_eq!(report["page_count"].as_u64(), Some(3));
}

#[test]
fn break_hint_is_taken_when_it_fits() {
    let request = r#"{"flows": [{"length": 1000.0, "height": 20.0, "break_hints": [400.0],
                                  "break_threshold": 100.0}],
                      "config": {"paper": {"width": 612.0, "height": 792.0,
                                 "margin_top": 72.0, "margin_right": 72.0,
                                 "margin_bottom": 72.0, "margin_left": 72.0}}}"#;
    let report: Value = serde_json::from_str(&layout_json(request).unwrap()).unwrap();
    let line = &report["flows"][0]["lines"][1];
    assert_eq!(line["flow_x"].as_f64(), Some(400.0));
    assert_eq!(line["is_automatic"].as_bool(), Some(true));
}

#[test]
fn canvas_positions_ignore_the_display_gap() {
    let with_gap = REQUEST.replace("\"display_gap\": 0.0", "\"display_gap\": 400.0");
    assert_ne!(with_gap, REQUEST);
    let report: Value = serde_json::from_str(&layout_json(&with_gap).unwrap()).unwrap();
    let line = &report["flows"][1]["lines"][1];
    assert_eq!(line["page_index"].as_u64(), Some(2));
    assert_eq!(line["canvas"]["x"].as_f64(), Some(2.0 * 612.0 + 12.0));
}

#[test]
fn malformed_requests_are_config_errors() {
    assert!(matches!(layout_json("{"), Err(FlowError::Config(_))));
    assert!(matches!(
        layout_json(r#"{"flows": [{"length": -5.0, "height": 10.0}]}"#),
        Err(FlowError::InvalidFlowGeometry(_))
    ));
}

#[test]
fn c_abi_round_trip() {
    let request = CString::new(REQUEST).unwrap();
    let result = unsafe { scoreflow_layout_json(request.as_ptr()) };
    assert!(!result.is_null());
    let json = unsafe { CStr::from_ptr(result) }.to_str().unwrap().to_owned();
    unsafe { scoreflow_free_string(result) };
    assert_eq!(json, layout_json(REQUEST).unwrap());

    let bad = CString::new("not json").unwrap();
    assert!(unsafe { scoreflow_layout_json(bad.as_ptr()) }.is_null());
    assert!(unsafe { scoreflow_layout_json(std::ptr::null()) }.is_null());
}
