//! Navigation destinations
//!
//! Applications describe screens as plain enums and implement
//! [`NavigationDestination`] for them:
//!
//! ```ignore
//! #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
//! enum HomeDestinations {
//!     Page2,
//!     PageN(i32),
//! }
//!
//! impl NavigationDestination for HomeDestinations {
//!     fn body(&self) -> Body {
//!         match self {
//!             HomeDestinations::Page2 => Body::new("HomePage2View"),
//!             HomeDestinations::PageN(n) => Body::new("HomePageNView").titled(format!("Page {n}")),
//!         }
//!     }
//! }
//! ```
//!
//! The coordinator stores them type-erased as [`AnyDestination`], whose
//! identity is a stable hash of the type and value.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::method::NavigationMethod;

/// What the send queue does after a destination has been navigated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiveResumeType {
    /// Continue once the navigation has settled
    #[default]
    Auto,
    /// Continue without waiting for presentation to settle
    Immediately,
    /// Halt until something calls `resume()`
    Pause,
    /// Drop whatever is left in the sequence
    Cancel,
}

/// Renderer-facing description of a destination's content.
///
/// The rendering layer maps `view` to its own widget; the coordinator never
/// looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Body {
    pub view: String,
    pub title: Option<String>,
}

impl Body {
    pub fn new(view: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            title: None,
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Display title with fallback to the view name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.view)
    }
}

pub trait NavigationDestination:
    fmt::Debug + Clone + Hash + Eq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    fn body(&self) -> Body;

    fn method(&self) -> NavigationMethod {
        NavigationMethod::Push
    }

    fn receive_resume_type(&self) -> ReceiveResumeType {
        ReceiveResumeType::Auto
    }

    /// Key used for registration and restoration. Override to keep restored
    /// snapshots readable across renames.
    fn type_key() -> &'static str
    where
        Self: Sized,
    {
        std::any::type_name::<Self>()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DestinationId(u64);

impl DestinationId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

trait ErasedDestination: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn key(&self) -> &'static str;
    fn resolve_body(&self) -> Body;
    fn resolve_method(&self) -> NavigationMethod;
    fn resume_type(&self) -> ReceiveResumeType;
    fn encode(&self) -> serde_json::Result<serde_json::Value>;
    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<D: NavigationDestination> ErasedDestination for D {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn key(&self) -> &'static str {
        D::type_key()
    }

    fn resolve_body(&self) -> Body {
        NavigationDestination::body(self)
    }

    fn resolve_method(&self) -> NavigationMethod {
        NavigationDestination::method(self)
    }

    fn resume_type(&self) -> ReceiveResumeType {
        NavigationDestination::receive_resume_type(self)
    }

    fn encode(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    fn fmt_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Type-erased destination as stored in paths and presentation slots
#[derive(Clone)]
pub struct AnyDestination {
    id: DestinationId,
    type_id: TypeId,
    inner: Arc<dyn ErasedDestination>,
}

impl AnyDestination {
    pub fn new<D: NavigationDestination>(destination: D) -> Self {
        let mut hasher = DefaultHasher::new();
        D::type_key().hash(&mut hasher);
        destination.hash(&mut hasher);

        Self {
            id: DestinationId(hasher.finish()),
            type_id: TypeId::of::<D>(),
            inner: Arc::new(destination),
        }
    }

    pub fn id(&self) -> DestinationId {
        self.id
    }

    pub fn type_key(&self) -> &'static str {
        self.inner.key()
    }

    pub fn is<D: NavigationDestination>(&self) -> bool {
        self.type_id == TypeId::of::<D>()
    }

    pub fn downcast_ref<D: NavigationDestination>(&self) -> Option<&D> {
        self.inner.as_any().downcast_ref::<D>()
    }

    pub fn body(&self) -> Body {
        self.inner.resolve_body()
    }

    pub fn method(&self) -> NavigationMethod {
        self.inner.resolve_method()
    }

    pub fn receive_resume_type(&self) -> ReceiveResumeType {
        self.inner.resume_type()
    }

    pub fn encode(&self) -> serde_json::Result<EncodedDestination> {
        Ok(EncodedDestination {
            type_key: self.type_key().to_string(),
            value: self.inner.encode()?,
        })
    }
}

impl PartialEq for AnyDestination {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AnyDestination {}

impl Hash for AnyDestination {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AnyDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt_debug(f)
    }
}

impl<D: NavigationDestination> From<D> for AnyDestination {
    fn from(destination: D) -> Self {
        AnyDestination::new(destination)
    }
}

/// Serialized form used by restoration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedDestination {
    pub type_key: String,
    pub value: serde_json::Value,
}

type Decoder = fn(serde_json::Value) -> serde_json::Result<AnyDestination>;

fn decode_as<D: NavigationDestination>(value: serde_json::Value) -> serde_json::Result<AnyDestination> {
    Ok(AnyDestination::new(serde_json::from_value::<D>(value)?))
}

/// Every destination type registered anywhere in a navigation tree, with the
/// decoder restoration needs to rebuild it.
#[derive(Default)]
pub(crate) struct DestinationTypes {
    decoders: HashMap<&'static str, Decoder>,
}

impl DestinationTypes {
    pub fn register<D: NavigationDestination>(&mut self) -> &'static str {
        let key = D::type_key();
        self.decoders.insert(key, decode_as::<D>);
        key
    }

    pub fn decode(&self, encoded: &EncodedDestination) -> Option<serde_json::Result<AnyDestination>> {
        self.decoders
            .get(encoded.type_key.as_str())
            .map(|decode| decode(encoded.value.clone()))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_method_resolution_is_deterministic() {
        for destination in [
            HomeDestinations::Page2,
            HomeDestinations::PageN(88),
            HomeDestinations::Presented1,
        ] {
            let erased = AnyDestination::new(destination.clone());
            assert_eq!(erased.method(), erased.method());
            assert_eq!(erased.method(), destination.method());
        }
        assert_eq!(
            AnyDestination::new(HomeDestinations::Page3).method(),
            NavigationMethod::Push
        );
        assert_eq!(
            AnyDestination::new(HomeDestinations::Page3).receive_resume_type(),
            ReceiveResumeType::Auto
        );
    }

    #[test]
    fn test_identity() {
        let a = AnyDestination::new(HomeDestinations::PageN(88));
        let b = AnyDestination::new(HomeDestinations::PageN(88));
        let c = AnyDestination::new(HomeDestinations::PageN(89));
        assert_eq!(a, b);
        assert_eq!(a.id(), b.id());
        assert_ne!(a, c);

        // Same shape, different type
        let settings = AnyDestination::new(SettingsDestinations::Page2);
        let home = AnyDestination::new(HomeDestinations::Page2);
        assert_ne!(settings, home);
    }

    #[test]
    fn test_downcast() {
        let erased = AnyDestination::new(HomeDestinations::PageN(3));
        assert!(erased.is::<HomeDestinations>());
        assert_eq!(
            erased.downcast_ref::<HomeDestinations>(),
            Some(&HomeDestinations::PageN(3))
        );
        assert!(erased.downcast_ref::<SettingsDestinations>().is_none());
        assert_eq!(erased.body().display_title(), "Page 3");
        assert_eq!(format!("{erased:?}"), "PageN(3)");
    }

    #[test]
    fn test_decoder_table() {
        let mut types = DestinationTypes::default();
        let key = types.register::<SettingsDestinations>();
        assert_eq!(key, "settings");

        let encoded = AnyDestination::new(SettingsDestinations::Page3).encode().unwrap();
        let decoded = types.decode(&encoded).unwrap().unwrap();
        assert_eq!(decoded, AnyDestination::new(SettingsDestinations::Page3));

        let unknown = AnyDestination::new(HomeDestinations::Page2).encode().unwrap();
        assert!(types.decode(&unknown).is_none());
    }
}
