//! scoreflow: flowable layout for paginated music notation.
//!
//! A [`Document`] holds a scene graph of positioned nodes. Flow containers
//! lay their children out along an unbounded logical line, which is cut into
//! lines and pages that fit the paper's live area. Nodes inside a flow keep
//! their logical positions; canvas positions and break-aware rendering are
//! derived from the flow's break layout.
//!
//! # Example
//! ```no_run
//! use scoreflow::{Document, LayoutConfig, Length, Point};
//!
//! let mut doc = Document::new(LayoutConfig::default()).unwrap();
//! let page = doc.page(0).unwrap();
//! let flow = doc
//!     .add_flow(page, Point::default(), Length::mm(500.0), Length::mm(20.0))
//!     .unwrap();
//! let slur = doc
//!     .add_breakable(flow, Point::new(Length::mm(100.0), Length::mm(5.0)), Length::mm(200.0))
//!     .unwrap();
//! println!("lines: {}", doc.flow_layout(flow).unwrap().lines().len());
//! println!("segments: {}", doc.segments(slur).unwrap().len());
//! ```

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mapping;
pub mod page;
pub mod paper;
pub mod preview;
pub mod render;
pub mod report;
pub mod scene;
pub mod spanner;
pub mod units;

pub use config::LayoutConfig;
pub use document::Document;
pub use error::FlowError;
pub use geometry::{Point, Rect, ORIGIN};
pub use layout::{BreakController, FlowContainer, FlowLayout, MarginController};
pub use mapping::{first_ancestor_of_capability, map_between, map_x_between};
pub use page::{Page, PageProvider, PageSide, PageSupplier};
pub use paper::{Paper, A4, LETTER};
pub use preview::render_preview_svg;
pub use render::{FlowRender, Segment, SegmentKind};
pub use report::{layout_json, LayoutReport, LayoutRequest};
pub use scene::{Capability, Extent, NodeData, NodeId, NodeKind, SceneGraph};
pub use spanner::SpannerEnd;
pub use units::{Length, ZERO};

// ═══════════════════════════════════════════════════════════════════════
// C FFI: for iOS (static library) and other native hosts
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Lay out the flows described by a JSON [`LayoutRequest`] and return the
/// JSON [`LayoutReport`] as a C string, or null on any error.
/// The caller must free the returned string with `scoreflow_free_string`.
///
/// # Safety
/// `request` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn scoreflow_layout_json(request: *const c_char) -> *mut c_char {
    if request.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(request) };
    let request_str = match c_str.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match layout_json(request_str) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by scoreflow functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a scoreflow function, or null.
#[no_mangle]
pub unsafe extern "C" fn scoreflow_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
