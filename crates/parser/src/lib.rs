//! From response bytes, produce the SEO-relevant facts that go into a
//! `PageResult` (C5, §4.5). The caller supplies everything the extractor
//! itself cannot know: the request URL, status code, timing, redirect
//! chain, and any transport error.

pub mod html;

pub use html::{extract, ExtractedPage};
