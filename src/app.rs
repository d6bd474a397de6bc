use tracing::{debug, info};

use crate::domain::{PdbId, StructureRecord};
use crate::error::PdbError;
use crate::extract;
use crate::rcsb::RcsbClient;
use crate::store::Store;

/// Lookup orchestration: decide cache-hit vs cache-miss, coordinate fetch,
/// extraction and persistence, return the unified record.
#[derive(Clone)]
pub struct App<R: RcsbClient> {
    store: Store,
    rcsb: R,
}

impl<R: RcsbClient> App<R> {
    pub fn new(store: Store, rcsb: R) -> Self {
        Self { store, rcsb }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Returns the record for `raw_id`, from cache when both the JSON entry
    /// and the image are present, otherwise from the network.
    ///
    /// A full cache hit performs zero network calls. On any partial miss the
    /// page is re-fetched and the cached JSON overwritten; the image is only
    /// fetched when the image file itself is absent.
    pub fn get_pdb_info(&self, raw_id: &str) -> Result<StructureRecord, PdbError> {
        let id: PdbId = raw_id.parse()?;

        if let Some(mut record) = self.store.load_record(&id)? {
            if self.store.has_image(&id) {
                debug!(%id, "loaded record from cache");
                record.local_image_path = Some(self.store.image_path(&id).to_string());
                return Ok(record);
            }
        }

        info!(%id, "cache miss, fetching from RCSB");
        let page = self.rcsb.fetch_structure_page(&id)?;
        let mut record = extract::extract_record(&id, &page);

        if !self.store.has_image(&id) {
            debug!(%id, "downloading assembly image");
            let image = self.rcsb.fetch_image(&id)?;
            self.store.write_image(&id, &image)?;
        }
        record.local_image_path = Some(self.store.image_path(&id).to_string());

        self.store.save_record(&id, &record)?;
        Ok(record)
    }
}
