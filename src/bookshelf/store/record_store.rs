use super::{Layout, LoadStatus, PlainArray, Record, StorageBackend};
use crate::error::{CatalogError, Result};
use tracing::debug;
use uuid::Uuid;

/// An ordered, in-memory collection of records mirrored to one file.
///
/// The collection is empty until [`RecordStore::load`] is called. Every
/// mutating operation saves the whole collection; when the save fails the
/// mutation is undone in memory before the error is returned, so the
/// collection never holds changes the backend refused.
pub struct RecordStore<T, B, L = PlainArray>
where
    T: Record,
    B: StorageBackend,
    L: Layout<T>,
{
    backend: B,
    layout: L,
    records: Vec<T>,
}

impl<T: Record, B: StorageBackend> RecordStore<T, B, PlainArray> {
    pub fn new(backend: B) -> Self {
        Self::with_layout(backend, PlainArray)
    }
}

impl<T, B, L> RecordStore<T, B, L>
where
    T: Record,
    B: StorageBackend,
    L: Layout<T> + Clone,
{
    pub fn with_layout(backend: B, layout: L) -> Self {
        Self {
            backend,
            layout,
            records: Vec::new(),
        }
    }

    /// Read the backing file into memory, replacing whatever was loaded.
    ///
    /// A missing file is the first-run case and yields [`LoadStatus::Fresh`].
    /// Unreadable or unparseable files are errors and leave the collection
    /// empty. The layout is reset either way, so nothing from an earlier load
    /// survives.
    pub fn load(&mut self) -> Result<LoadStatus> {
        self.records.clear();
        self.layout.reset();

        let Some(raw) = self.backend.read()? else {
            debug!(location = %self.backend.location().display(), "no catalog file yet");
            return Ok(LoadStatus::Fresh);
        };

        let records = self
            .layout
            .decode(&raw)
            .map_err(|source| CatalogError::Corrupt {
                path: self.backend.location(),
                source,
            })?;
        self.records = records;

        debug!(
            location = %self.backend.location().display(),
            count = self.records.len(),
            "catalog loaded"
        );
        Ok(LoadStatus::Loaded(self.records.len()))
    }

    /// Write the whole collection, replacing the file.
    ///
    /// Encoding runs on a copy of the layout, which replaces the live one
    /// only once the backend accepted the write.
    pub fn save(&mut self) -> Result<()> {
        let mut staged = self.layout.clone();
        let content = staged
            .encode(&self.records)
            .map_err(CatalogError::Serialization)?;
        self.backend.write(&content)?;
        self.layout = staged;
        debug!(count = self.records.len(), "catalog saved");
        Ok(())
    }

    pub fn create(&mut self, draft: T::Draft) -> Result<T> {
        let record = T::from_draft(Uuid::new_v4(), draft);
        self.records.push(record.clone());

        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(record)
    }

    /// Create several records with a single save.
    pub fn create_many(&mut self, drafts: Vec<T::Draft>) -> Result<Vec<T>> {
        let created: Vec<T> = drafts
            .into_iter()
            .map(|draft| T::from_draft(Uuid::new_v4(), draft))
            .collect();

        let before = self.records.len();
        self.records.extend(created.iter().cloned());

        if let Err(e) = self.save() {
            self.records.truncate(before);
            return Err(e);
        }
        Ok(created)
    }

    /// All records in insertion order.
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&T> {
        self.records.iter().find(|r| r.id() == *id)
    }

    pub fn find_where<P>(&self, mut predicate: P) -> Vec<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).collect()
    }

    /// Merge `patch` onto the record with `id`. `Ok(None)` if there is none.
    pub fn update(&mut self, id: &Uuid, patch: T::Patch) -> Result<Option<T>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let previous = self.records[index].clone();
        self.records[index].apply(patch);

        if let Err(e) = self.save() {
            self.records[index] = previous;
            return Err(e);
        }
        Ok(Some(self.records[index].clone()))
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &Uuid) -> Result<bool> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };

        let removed = self.records.remove(index);
        if let Err(e) = self.save() {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id() == *id)
    }
}
