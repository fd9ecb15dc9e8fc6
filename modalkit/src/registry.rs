//! Component registry: resolves logical modal names to loadable components.
//!
//! Sources are declared up front (explicitly or through
//! [`register_modal!`](crate::register_modal)). A name moves from unloaded
//! to loading to loaded at most once; concurrent requests share the single
//! in-flight load. Failures are recorded and never retried automatically.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, FutureExt, Shared};

use crate::component::ComponentHandle;
use crate::error::{LoadError, RegistryError};
use crate::registration::registered_modals;
use crate::wakeup::{WakeupSender, WakeupSlot};

/// Future produced by a component loader.
pub type LoadFuture = BoxFuture<'static, Result<ComponentHandle, LoadError>>;

/// Type-erased component loader.
pub type Loader = Arc<dyn Fn() -> LoadFuture + Send + Sync>;

/// Outcome of [`ComponentRegistry::ensure_loaded`].
pub type LoadResult = Result<ComponentHandle, RegistryError>;

// =============================================================================
// Sources
// =============================================================================

/// Which reserved marker a source file name carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `Name.mdl.*`
    Standard,
    /// `Name.amdl.*`
    Alternate,
}

impl SourceKind {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "mdl" => Some(Self::Standard),
            "amdl" => Some(Self::Alternate),
            _ => None,
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Standard => "mdl",
            Self::Alternate => "amdl",
        }
    }
}

/// Split a source location into its logical name and marker kind.
///
/// The logical name is the file name up to its first `.`; the remaining
/// dot-separated tokens must contain a reserved marker.
///
/// ```
/// use modalkit::registry::{parse_source_path, SourceKind};
///
/// assert_eq!(
///     parse_source_path("dialogs/Confirm.mdl.rs"),
///     Some(("Confirm".to_string(), SourceKind::Standard)),
/// );
/// assert_eq!(parse_source_path("dialogs/Confirm.rs"), None);
/// ```
pub fn parse_source_path(path: &str) -> Option<(String, SourceKind)> {
    let file = path.rsplit(['/', '\\']).next()?;
    let mut tokens = file.split('.');
    let name = tokens.next().filter(|name| !name.is_empty())?;
    let kind = tokens.find_map(SourceKind::from_marker)?;
    Some((name.to_string(), kind))
}

/// A declared modal implementation.
#[derive(Clone)]
pub struct ModalSource {
    name: String,
    kind: SourceKind,
    location: String,
    loader: Loader,
}

impl ModalSource {
    /// Declare a source by location. The logical name comes from the path.
    pub fn from_path<F, Fut>(path: &str, loader: F) -> Result<Self, RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ComponentHandle, LoadError>> + Send + 'static,
    {
        let (name, kind) = parse_source_path(path).ok_or_else(|| RegistryError::InvalidSource {
            path: path.to_string(),
        })?;
        Ok(Self {
            name,
            kind,
            location: path.to_string(),
            loader: Arc::new(move || loader().boxed()),
        })
    }

    /// Declare an already constructed component under `name`.
    pub fn component(name: impl Into<String>, component: ComponentHandle) -> Self {
        let name = name.into();
        Self {
            location: format!("{name}.{}", SourceKind::Standard.marker()),
            name,
            kind: SourceKind::Standard,
            loader: Arc::new(move || {
                future::ready(Ok::<_, LoadError>(Arc::clone(&component))).boxed()
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

impl fmt::Debug for ModalSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalSource")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Collects sources and builds a [`ComponentRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    sources: Vec<ModalSource>,
}

impl RegistryBuilder {
    pub fn source(mut self, source: ModalSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = ModalSource>) -> Self {
        self.sources.extend(sources);
        self
    }

    /// Add every source submitted with `register_modal!`.
    pub fn registered(mut self) -> Result<Self, RegistryError> {
        for registration in registered_modals() {
            self.sources.push(registration.source()?);
        }
        Ok(self)
    }

    /// Index the sources by logical name.
    ///
    /// Fails if two sources share a name.
    pub fn build(self) -> Result<ComponentRegistry, RegistryError> {
        let mut sources: HashMap<String, ModalSource> = HashMap::new();
        for source in self.sources {
            if let Some(existing) = sources.get(&source.name) {
                return Err(RegistryError::DuplicateSource {
                    name: source.name.clone(),
                    first: existing.location.clone(),
                    second: source.location.clone(),
                });
            }
            sources.insert(source.name.clone(), source);
        }

        log::debug!("[registry] indexed {} modal source(s)", sources.len());
        Ok(ComponentRegistry {
            inner: Arc::new(Mutex::new(RegistryInner {
                sources,
                slots: HashMap::new(),
            })),
            wakeup: WakeupSlot::default(),
        })
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Load state of a logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Never requested.
    Unloaded,
    /// A load is in flight.
    Loading,
    /// Component is cached and renderable.
    Loaded,
    /// No source carries this name.
    NotFound,
    /// The loader failed.
    Failed(RegistryError),
}

enum Slot {
    Loading(Shared<BoxFuture<'static, LoadResult>>),
    Loaded(ComponentHandle),
    NotFound,
    Failed(RegistryError),
}

#[derive(Default)]
struct RegistryInner {
    sources: HashMap<String, ModalSource>,
    slots: HashMap<String, Slot>,
}

/// Name to component resolution and load cache.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    wakeup: WakeupSlot,
}

impl ComponentRegistry {
    /// An empty registry. Every name resolves to not-found.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Install the sender woken whenever a load completes.
    pub fn install_wakeup(&self, sender: WakeupSender) {
        self.wakeup.install(sender);
    }

    /// Resolve `name` and load its component once.
    ///
    /// Cached components resolve immediately; an in-flight load is shared
    /// rather than repeated; recorded failures are returned as-is.
    pub fn ensure_loaded(&self, name: &str) -> BoxFuture<'static, LoadResult> {
        let mut inner = self.lock();

        match inner.slots.get(name) {
            Some(Slot::Loaded(component)) => {
                return future::ready(Ok(Arc::clone(component))).boxed();
            }
            Some(Slot::Loading(load)) => return load.clone().boxed(),
            Some(Slot::NotFound) => {
                return future::ready(Err(RegistryError::NotFound {
                    name: name.to_string(),
                }))
                .boxed();
            }
            Some(Slot::Failed(err)) => return future::ready(Err(err.clone())).boxed(),
            None => {}
        }

        let found = inner
            .sources
            .get(name)
            .map(|source| (Arc::clone(&source.loader), source.location.clone()));
        let Some((loader, location)) = found else {
            log::warn!("[registry] component for \"{name}\" not found");
            inner.slots.insert(name.to_string(), Slot::NotFound);
            return future::ready(Err(RegistryError::NotFound {
                name: name.to_string(),
            }))
            .boxed();
        };

        log::debug!("[registry] loading \"{name}\" from {location}");
        // Weak: the in-flight load lives in a slot of the state it updates.
        let state = Arc::downgrade(&self.inner);
        let wakeup = self.wakeup.clone();
        let owned_name = name.to_string();
        let load = async move {
            let result = loader()
                .await
                .map_err(|source| RegistryError::LoadFailed {
                    name: owned_name.clone(),
                    source,
                });
            match state.upgrade() {
                Some(state) => {
                    record(&state, &owned_name, &result);
                    wakeup.notify();
                }
                None => log::debug!("[registry] \"{owned_name}\" loaded after registry drop"),
            }
            result
        }
        .boxed()
        .shared();

        inner
            .slots
            .insert(name.to_string(), Slot::Loading(load.clone()));
        load.boxed()
    }

    /// Start loading `name` without waiting for it.
    ///
    /// The load runs on the current tokio runtime. Outside a runtime it
    /// stays pending until someone awaits [`Self::ensure_loaded`].
    pub fn load_in_background(&self, name: &str) {
        let load = self.ensure_loaded(name);
        if self.status(name) != LoadStatus::Loading {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                // Outcome is recorded by the load itself.
                handle.spawn(load.map(|_| ()));
            }
            Err(_) => log::debug!("[registry] no runtime; \"{name}\" loads on first await"),
        }
    }

    /// Load every declared source.
    pub fn preload_all(&self) -> BoxFuture<'static, Vec<LoadResult>> {
        let loads: Vec<_> = self
            .names()
            .iter()
            .map(|name| self.ensure_loaded(name))
            .collect();
        future::join_all(loads).boxed()
    }

    pub fn status(&self, name: &str) -> LoadStatus {
        match self.lock().slots.get(name) {
            None => LoadStatus::Unloaded,
            Some(Slot::Loading(_)) => LoadStatus::Loading,
            Some(Slot::Loaded(_)) => LoadStatus::Loaded,
            Some(Slot::NotFound) => LoadStatus::NotFound,
            Some(Slot::Failed(err)) => LoadStatus::Failed(err.clone()),
        }
    }

    /// The cached component for `name`, if loaded.
    pub fn component(&self, name: &str) -> Option<ComponentHandle> {
        match self.lock().slots.get(name) {
            Some(Slot::Loaded(component)) => Some(Arc::clone(component)),
            _ => None,
        }
    }

    /// Every loaded component by name. This is the renderable set.
    pub fn loaded_components(&self) -> HashMap<String, ComponentHandle> {
        self.lock()
            .slots
            .iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Loaded(component) => Some((name.clone(), Arc::clone(component))),
                _ => None,
            })
            .collect()
    }

    /// Declared logical names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lock().sources.keys().cloned().collect();
        names.sort();
        names
    }

    /// Whether a source is declared for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lock().sources.contains_key(name)
    }
}

/// Store the outcome of a finished load.
fn record(state: &Mutex<RegistryInner>, name: &str, result: &LoadResult) {
    let slot = match result {
        Ok(component) => {
            log::debug!("[registry] loaded \"{name}\"");
            Slot::Loaded(Arc::clone(component))
        }
        Err(err) => {
            log::warn!("[registry] {err}");
            Slot::Failed(err.clone())
        }
    };
    state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .slots
        .insert(name.to_string(), slot);
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("sources", &self.names())
            .finish_non_exhaustive()
    }
}
