use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;

/// Where a stats record lives between runs.
pub trait StatsStorage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&self, contents: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Platform data directory plus `mindgames`, or the working directory
    /// when the platform has none.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindgames")
    }
}

impl StatsStorage for JsonFileStorage {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, contents)
    }
}

/// In-process buffer. Clones share the same contents, so a test can keep one
/// handle and inspect what the manager wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: &str) -> Self {
        Self {
            contents: Rc::new(RefCell::new(Some(contents.to_string()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl StatsStorage for MemoryStorage {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.contents())
    }

    fn save(&self, contents: &str) -> io::Result<()> {
        *self.contents.borrow_mut() = Some(contents.to_string());
        Ok(())
    }
}

/// Owns one stats record and writes it back after every change.
pub struct StatsManager<T> {
    storage: Box<dyn StatsStorage>,
    stats: T,
}

impl<T> StatsManager<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Missing or unreadable data starts over from `T::default()`.
    pub fn load(storage: Box<dyn StatsStorage>) -> Self {
        let stats = match storage.load() {
            Ok(Some(contents)) => match serde_json::from_str::<T>(&contents) {
                Ok(stats) => stats,
                Err(e) => {
                    log::warn!(target: "stats", "Discarding corrupt stats: {}", e);
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!(target: "stats", "Could not read stats: {}", e);
                T::default()
            }
        };
        Self { storage, stats }
    }

    /// Stats backed by a JSON file at `path`.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::load(Box::new(JsonFileStorage::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryStorage::new()))
    }

    pub fn stats(&self) -> &T {
        &self.stats
    }

    /// Apply `update` and persist. A failed save is logged; the in-memory
    /// record keeps the update either way.
    pub fn record<F>(&mut self, update: F) -> &T
    where
        F: FnOnce(&mut T),
    {
        update(&mut self.stats);
        if let Err(e) = self.save() {
            log::error!(target: "stats", "Failed to save stats: {}", e);
        }
        &self.stats
    }

    pub fn save(&self) -> io::Result<()> {
        let contents = serde_json::to_string_pretty(&self.stats)?;
        self.storage.save(&contents)
    }
}
