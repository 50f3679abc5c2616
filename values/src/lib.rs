//! Host value model for Spyglass.
//!
//! A [`Value`] is an arbitrarily-typed runtime object as the host REPL sees it:
//! scalars, strings, byte buffers, containers, functions, classes, attribute
//! bags and opaque third-party objects. Reference variants share their storage
//! through `Rc`, so cloning a `Value` aliases the same object and
//! [`Value::is_same`] is an identity check. Mutable containers sit behind
//! `RefCell`, which is what makes self-referential values constructible.
//!
//! Third-party objects (arrays, data frames, connections, ...) plug in through
//! [`HostObject`] and the narrow capability traits in [`host`].

#![deny(unsafe_code)]

pub mod datetime;
pub mod error;
pub mod host;
pub mod number;
pub mod repr;
pub mod value;

mod equality;

pub use datetime::Datetime;
pub use error::HostError;
pub use host::{ArrayLike, ColumnLike, ConnectionLike, FrameLike, HostObject, Protocols};
pub use number::Complex;
pub use value::{Class, Function, Object, ObjectRepr, Property, Range, TypeName, Value};
