mod get_hash;
pub(crate) use get_hash::get_hash as get_hash;

mod fetch_manifest;
pub(crate) use fetch_manifest::fetch_manifest as fetch_manifest;

mod scan;
pub(crate) use scan::scan as scan;

mod download_worker;
pub(crate) use download_worker::run_worker as run_worker;
pub(crate) use download_worker::WorkerContext as WorkerContext;

mod flow;
pub(crate) use flow::flow as flow;
pub(crate) use flow::FlowContext as FlowContext;
