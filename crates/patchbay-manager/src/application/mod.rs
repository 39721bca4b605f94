//! Application layer of the Patchbay manager.
//!
//! # What is the "application" layer? (for beginners)
//!
//! In Clean Architecture the *application* layer sits between the domain
//! (pure business rules, here in `patchbay-core`) and the infrastructure
//! (file system, launcher icons, the terminal).
//!
//! Code in this layer:
//!
//! - **Orchestrates** the config store to fulfil a user goal (e.g., "flip
//!   this hook for the active clone and show me the updated catalog").
//! - **Depends on abstractions** (traits) rather than concrete
//!   implementations, so the infrastructure can be swapped without changing
//!   this code.
//! - **Contains no file system access and no OS calls.**
//!
//! # Sub-modules
//!
//! - **`settings_catalog`** – The fixed table of user-facing settings: ids,
//!   titles, defaults, validators, and the capability gates that decide which
//!   entries appear.  Pure functions from a store snapshot to the grouped
//!   catalog the presentation layer renders.
//!
//! - **`view_model`** – The observable state holder: owns the config store,
//!   applies change requests, and republishes the whole catalog after every
//!   mutation.  This is the only write path the presentation layer gets.

pub mod settings_catalog;
pub mod view_model;
