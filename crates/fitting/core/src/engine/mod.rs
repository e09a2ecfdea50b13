//! The resolution engine: read-only queries over a [`FitContext`].
//!
//! Everything here is synchronous and side-effect free on its inputs. The
//! operations borrow the context, allocate only their own output, and
//! surface the first failing sub-step as a [`ResolveError`]; no partial
//! results are ever returned.
//!
//! [`FitContext`]: crate::state::FitContext

pub mod affector;
pub mod aggregate;
pub mod effects;
pub mod errors;
pub mod filter;
mod walk;

pub use affector::{Affector, AffectorFlags, AffectorList, enumerate_affectors};
pub use aggregate::{apply_single_modifier, attribute_value};
pub use effects::{has_active_effects, has_overload_effects};
pub use errors::ResolveError;
pub use filter::is_modifier_applicable;
