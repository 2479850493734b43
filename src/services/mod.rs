pub mod archive;
pub mod cleanup;
pub mod document;
pub mod image_composer;
pub mod order_download;
pub mod order_form;
pub mod order_submit;
pub mod page_wait;
pub mod receipt;

pub use archive::{create_archive, ArchiveSummary};
pub use cleanup::{cleanup_work_dir, CleanupReport, WorkDir};
pub use document::{order_another, ChromePdfExporter, DocumentExporter};
pub use image_composer::ImageComposer;
pub use order_download::{HttpOrdersFetcher, OrdersFetcher};
pub use order_form::fill_form;
pub use order_submit::{submit_with_retry, RetryPolicy, SubmitOutcome};
pub use page_wait::{click_button_when_ready, click_when_ready, wait_for_element};
pub use receipt::{extract_receipt, read_order_id, Receipt};
