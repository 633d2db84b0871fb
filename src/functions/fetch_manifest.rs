use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::implementations::selection::merge_lists;
use crate::structures::{ClientSelection, Error, ManifestEntry};
use crate::traits::RemoteSource;

/// Pause between consecutive sub-list GETs.
const LIST_FETCH_PAUSE: Duration = Duration::from_millis(500);

/// Fetches the sub-lists named by the selection and unions them into the
/// de-duplicated dataset.
pub(crate) async fn fetch_manifest(
  source: &Arc<dyn RemoteSource>,
  selection: ClientSelection,
) -> Result<Vec<ManifestEntry>, Error> {
  let sub_lists = selection.sub_lists();
  let mut fetched = Vec::with_capacity(sub_lists.len());
  for (index, (name, reboot, additive)) in sub_lists.iter().enumerate() {
    if index > 0 {
      tokio::time::sleep(LIST_FETCH_PAUSE).await;
    }
    let entries = source.fetch_list(name, *reboot).await?;
    fetched.push((entries, *additive));
  }
  let manifest = merge_lists(fetched);
  info!("Manifest union holds {} entries", manifest.len());
  Ok(manifest)
}
