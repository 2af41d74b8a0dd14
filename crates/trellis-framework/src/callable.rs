//! Handler references and the callable resolver.
//!
//! A route stores a [`HandlerRef`], fixed at registration time. It may be an
//! inline [`Function`], a `"Class@method"` string, or a class/method pair. The
//! two named forms are looked up lazily at dispatch time, so a route can name
//! a controller before that controller is registered.
//!
//! Rust has no runtime reflection, so controllers opt in. A [`Controller`]
//! lists its methods in an [`Actions`] table, and the [`CallableResolver`]
//! maps class names to controllers. Resolving a named reference creates a
//! fresh instance from the controller's zero-argument factory and binds the
//! method to it:
//!
//! ```rust,ignore
//! #[derive(Default)]
//! struct SampleController;
//!
//! impl SampleController {
//!     fn home(&self) -> &'static str {
//!         "Home"
//!     }
//! }
//!
//! impl Controller for SampleController {
//!     fn actions(actions: &mut Actions<Self>) {
//!         actions.add("home", Self::home);
//!     }
//! }
//!
//! let mut resolver = CallableResolver::new();
//! resolver.register::<SampleController>();
//!
//! let home = resolver.resolve(&HandlerRef::action("SampleController@home"))?;
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{trace, warn};

use crate::error::InvalidCallableError;
use crate::handler::{Function, IntoAction, IntoFunction, Signature, Target};

// ============================================================================
// HandlerRef
// ============================================================================

/// A reference to a route's handler.
#[derive(Clone)]
pub enum HandlerRef {
    /// An inline closure or function.
    Function(Function),
    /// A `"Class@method"` string.
    Action(String),
    /// A class/method pair.
    Method {
        /// The controller class name.
        class: String,
        /// The method name.
        method: String,
    },
    /// Anything else. Never callable; kept so the error can name it.
    Other(Value),
}

impl HandlerRef {
    /// Wraps a closure or function.
    pub fn function<F, T>(f: F) -> Self
    where
        F: IntoFunction<T>,
    {
        Self::Function(f.into_function())
    }

    /// A `"Class@method"` reference.
    pub fn action(reference: impl Into<String>) -> Self {
        Self::Action(reference.into())
    }

    /// A reference to `method` on the controller type `C`.
    pub fn method<C: Controller>(method: impl Into<String>) -> Self {
        Self::Method {
            class: std::any::type_name::<C>().to_string(),
            method: method.into(),
        }
    }

    /// A reference to `method` on the controller registered as `class`.
    pub fn pair(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Method {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl From<Function> for HandlerRef {
    fn from(function: Function) -> Self {
        Self::Function(function)
    }
}

/// Interprets a loosely-typed reference, e.g. one read from configuration.
///
/// Strings become `Class@method` references and two-string arrays become
/// class/method pairs; everything else is kept as [`HandlerRef::Other`].
impl From<Value> for HandlerRef {
    fn from(value: Value) -> Self {
        match value {
            Value::String(reference) => Self::Action(reference),
            Value::Array(parts) => {
                if let [Value::String(class), Value::String(method)] = parts.as_slice() {
                    return Self::pair(class, method);
                }
                Self::Other(Value::Array(parts))
            }
            other => Self::Other(other),
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(function) => f.debug_tuple("Function").field(&function.label()).finish(),
            Self::Action(reference) => f.debug_tuple("Action").field(reference).finish(),
            Self::Method { class, method } => f
                .debug_struct("Method")
                .field("class", class)
                .field("method", method)
                .finish(),
            Self::Other(value) => f.debug_tuple("Other").field(value).finish(),
        }
    }
}

/// Marker types keeping the [`IntoHandlerRef`] implementations apart.
pub mod markers {
    /// Closures and functions.
    #[derive(Debug)]
    pub struct ViaFunction;
    /// Ready-made references and reference-like values.
    #[derive(Debug)]
    pub struct ViaRef;
}

/// Anything that can be registered as a route handler.
///
/// Implemented for closures and functions (via [`IntoFunction`]), `&str` and
/// `String` (`"Class@method"`), `(&str, &str)` pairs, [`Function`],
/// [`HandlerRef`], [`serde_json::Value`] and `i64`. The last two exist so
/// loosely-typed registrations fail at dispatch the same way a bad reference
/// does.
pub trait IntoHandlerRef<M> {
    /// Converts into a handler reference.
    fn into_handler_ref(self) -> HandlerRef;
}

impl<F, T> IntoHandlerRef<(markers::ViaFunction, T)> for F
where
    F: IntoFunction<T>,
{
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::Function(self.into_function())
    }
}

impl IntoHandlerRef<markers::ViaRef> for HandlerRef {
    fn into_handler_ref(self) -> HandlerRef {
        self
    }
}

impl IntoHandlerRef<markers::ViaRef> for Function {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::Function(self)
    }
}

impl IntoHandlerRef<markers::ViaRef> for &str {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::action(self)
    }
}

impl IntoHandlerRef<markers::ViaRef> for String {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::Action(self)
    }
}

impl IntoHandlerRef<markers::ViaRef> for (&str, &str) {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::pair(self.0, self.1)
    }
}

impl IntoHandlerRef<markers::ViaRef> for Value {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::from(self)
    }
}

impl IntoHandlerRef<markers::ViaRef> for i64 {
    fn into_handler_ref(self) -> HandlerRef {
        HandlerRef::Other(Value::from(self))
    }
}

// ============================================================================
// Controllers
// ============================================================================

/// A method of controller `C`, not yet bound to an instance.
pub struct Action<C> {
    signature: Signature,
    bind: Arc<dyn Fn(Arc<C>) -> Target + Send + Sync>,
}

impl<C> Action<C> {
    pub(crate) fn new<B>(signature: Signature, bind: B) -> Self
    where
        B: Fn(Arc<C>) -> Target + Send + Sync + 'static,
    {
        Self {
            signature,
            bind: Arc::new(bind),
        }
    }

    /// Declares a default for the parameter at `position`.
    pub fn with_default(&mut self, position: usize, value: impl Into<Value>) -> &mut Self {
        self.signature.set_default(position, value.into());
        self
    }

    /// Names the parameter at `position`, for diagnostics.
    pub fn with_name(&mut self, position: usize, name: impl Into<String>) -> &mut Self {
        self.signature.set_name(position, name.into());
        self
    }

    /// The parameter metadata.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Binds the method to `instance`.
    fn bind(&self, instance: Arc<C>, label: String) -> Function {
        let mut signature = self.signature.clone();
        signature.set_handler(label);
        Function::from_parts(signature, (self.bind)(instance))
    }
}

/// The method table of a controller.
pub struct Actions<C> {
    actions: HashMap<String, Action<C>>,
}

impl<C: Send + Sync + 'static> Actions<C> {
    fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Adds a method under `name`, replacing any previous one.
    pub fn add<F, T>(&mut self, name: impl Into<String>, method: F) -> &mut Action<C>
    where
        F: IntoAction<C, T>,
    {
        match self.actions.entry(name.into()) {
            Entry::Occupied(mut entry) => {
                entry.insert(method.into_action());
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(method.into_action()),
        }
    }

    /// Looks up a method.
    pub fn get(&self, name: &str) -> Option<&Action<C>> {
        self.actions.get(name)
    }

    /// The method names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// A class whose methods can be referenced by name from routes.
pub trait Controller: Send + Sync + Sized + 'static {
    /// Registers the controller's routable methods.
    fn actions(actions: &mut Actions<Self>);
}

/// Type-erased registry entry for one controller.
trait ControllerEntry: Send + Sync {
    fn resolve(&self, class: &str, method: &str) -> Result<Function, InvalidCallableError>;
}

struct Registered<C> {
    actions: Actions<C>,
    factory: Box<dyn Fn() -> Option<C> + Send + Sync>,
}

impl<C: Controller> ControllerEntry for Registered<C> {
    fn resolve(&self, class: &str, method: &str) -> Result<Function, InvalidCallableError> {
        let action =
            self.actions
                .get(method)
                .ok_or_else(|| InvalidCallableError::UnknownMethod {
                    class: class.to_string(),
                    method: method.to_string(),
                })?;

        let instance = (self.factory)().ok_or_else(|| InvalidCallableError::NotInstantiable {
            class: class.to_string(),
        })?;

        Ok(action.bind(Arc::new(instance), format!("{class}@{method}")))
    }
}

// ============================================================================
// CallableResolver
// ============================================================================

/// Turns [`HandlerRef`]s into invokable [`Function`]s.
#[derive(Default, Clone)]
pub struct CallableResolver {
    controllers: HashMap<String, Arc<dyn ControllerEntry>>,
    /// Bare type name to full type path. `None` once two controllers claim
    /// the same bare name.
    aliases: HashMap<String, Option<String>>,
}

impl CallableResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller constructed with `Default`.
    ///
    /// The controller is reachable both by its full type path
    /// (`my_app::controllers::UserController`) and by its bare type name
    /// (`UserController`). If two different controllers share a bare name,
    /// neither keeps it and only the full paths resolve.
    pub fn register<C: Controller + Default>(&mut self) -> &mut Self {
        self.register_with(|| Some(C::default()))
    }

    /// Registers a controller with a custom zero-argument factory.
    ///
    /// A factory returning `None` makes every reference to the controller
    /// fail as not instantiable.
    pub fn register_with<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: Controller,
        F: Fn() -> Option<C> + Send + Sync + 'static,
    {
        let mut actions = Actions::new();
        C::actions(&mut actions);

        let entry: Arc<dyn ControllerEntry> = Arc::new(Registered {
            actions,
            factory: Box::new(factory),
        });

        let full = std::any::type_name::<C>();
        let short = short_type_name(full);
        trace!(controller = full, "Registering controller");

        if short != full {
            match self.aliases.entry(short.to_string()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(Some(full.to_string()));
                }
                Entry::Occupied(mut occupied) => {
                    if occupied.get().as_deref().is_some_and(|owner| owner != full) {
                        warn!(
                            controller = full,
                            alias = short,
                            "Short controller name is ambiguous, use the full type path"
                        );
                        occupied.insert(None);
                    }
                }
            }
        }
        self.controllers.insert(full.to_string(), entry);
        self
    }

    /// Returns `true` if a controller is registered under `class`.
    pub fn contains(&self, class: &str) -> bool {
        self.lookup(class).is_some()
    }

    fn lookup(&self, class: &str) -> Option<&Arc<dyn ControllerEntry>> {
        self.controllers.get(class).or_else(|| {
            let full = self.aliases.get(class)?.as_deref()?;
            self.controllers.get(full)
        })
    }

    /// Resolves a handler reference.
    pub fn resolve(&self, handler: &HandlerRef) -> Result<Function, InvalidCallableError> {
        match handler {
            HandlerRef::Function(function) => Ok(function.clone()),
            HandlerRef::Action(reference) => match reference.split_once('@') {
                Some((class, method)) => self.resolve_method(class, method),
                None => Err(InvalidCallableError::MalformedReference {
                    reference: reference.clone(),
                }),
            },
            HandlerRef::Method { class, method } => self.resolve_method(class, method),
            HandlerRef::Other(value) => Err(InvalidCallableError::NotCallable {
                value: value.to_string(),
            }),
        }
    }

    fn resolve_method(&self, class: &str, method: &str) -> Result<Function, InvalidCallableError> {
        let entry = self
            .lookup(class)
            .ok_or_else(|| InvalidCallableError::UnknownClass {
                class: class.to_string(),
            })?;

        entry.resolve(class, method)
    }
}

impl fmt::Debug for CallableResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.controllers.keys().map(String::as_str).collect();
        names.extend(
            self.aliases
                .iter()
                .filter(|(_, full)| full.is_some())
                .map(|(short, _)| short.as_str()),
        );
        names.sort_unstable();
        f.debug_struct("CallableResolver")
            .field("controllers", &names)
            .finish()
    }
}

/// `a::b::Name<c::D>` → `Name`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
