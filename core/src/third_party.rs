//! Optional numeric and data-frame libraries.
//!
//! The embedding runtime installs a binding for each library it has loaded,
//! once, at start-up. Inspectors reach the libraries only through the
//! accessors here, which fail with [`InspectError::LibraryUnavailable`] when
//! no binding was installed.

use once_cell::sync::OnceCell;
use spyglass_values::{HostError, Value};
use tracing::debug;

use crate::{
    errors::{InspectError, Result},
    options::ArrayPrintOptions,
};

/// Module-level numpy functions.
pub trait NumpyModule: Send + Sync {
    /// `numpy.array2string(array, ...)`.
    fn array2string(&self, array: &Value, options: &ArrayPrintOptions) -> Result<String, HostError>;

    /// `numpy.array_equal(a, b)`.
    fn array_equal(&self, a: &Value, b: &Value) -> Result<bool, HostError>;
}

/// Module-level torch functions.
pub trait TorchModule: Send + Sync {
    /// `str(tensor)` under the given print options, e.g. `tensor([1, 2])`.
    fn tensor_str(&self, tensor: &Value, options: &ArrayPrintOptions) -> Result<String, HostError>;

    /// `torch.equal(a, b)`.
    fn equal(&self, a: &Value, b: &Value) -> Result<bool, HostError>;
}

/// Module-level pandas functions.
pub trait PandasModule: Send + Sync {
    /// `pandas.Timestamp.fromisoformat(text)`.
    fn timestamp_from_isoformat(&self, text: &str) -> Result<Value, HostError>;
}

static NUMPY: OnceCell<Box<dyn NumpyModule>> = OnceCell::new();
static TORCH: OnceCell<Box<dyn TorchModule>> = OnceCell::new();
static PANDAS: OnceCell<Box<dyn PandasModule>> = OnceCell::new();

/// Install the numpy binding. Hands the binding back if one is already installed.
pub fn install_numpy(module: Box<dyn NumpyModule>) -> Result<(), Box<dyn NumpyModule>> {
    NUMPY.set(module)
}

/// Install the torch binding. Hands the binding back if one is already installed.
pub fn install_torch(module: Box<dyn TorchModule>) -> Result<(), Box<dyn TorchModule>> {
    TORCH.set(module)
}

/// Install the pandas binding. Hands the binding back if one is already installed.
pub fn install_pandas(module: Box<dyn PandasModule>) -> Result<(), Box<dyn PandasModule>> {
    PANDAS.set(module)
}

pub fn numpy() -> Result<&'static dyn NumpyModule> {
    NUMPY
        .get()
        .map(|module| &**module)
        .ok_or(InspectError::LibraryUnavailable { library: "numpy" })
}

pub fn torch() -> Result<&'static dyn TorchModule> {
    TORCH
        .get()
        .map(|module| &**module)
        .ok_or(InspectError::LibraryUnavailable { library: "torch" })
}

pub fn pandas() -> Result<&'static dyn PandasModule> {
    PANDAS
        .get()
        .map(|module| &**module)
        .ok_or(InspectError::LibraryUnavailable { library: "pandas" })
}

/// Which comparison method a library version provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualsMethod {
    /// `.equals(other)`.
    Current,
    /// The method `.equals` replaced (`series_equal`, `frame_equal`).
    Legacy,
}

/// A comparison method resolved on first use and remembered for the process.
///
/// The installed library version cannot change while the process runs, so
/// the first call that reveals whether `.equals` exists settles it.
#[derive(Debug)]
pub struct EqualsProbe {
    name: &'static str,
    method: OnceCell<EqualsMethod>,
}

impl EqualsProbe {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            method: OnceCell::new(),
        }
    }

    /// The resolved method, if any call has settled it yet.
    pub fn resolved(&self) -> Option<EqualsMethod> {
        self.method.get().copied()
    }

    pub fn call(
        &self,
        current: impl FnOnce() -> Result<bool, HostError>,
        legacy: impl FnOnce() -> Result<bool, HostError>,
    ) -> Result<bool, HostError> {
        match self.resolved() {
            Some(EqualsMethod::Current) => current(),
            Some(EqualsMethod::Legacy) => legacy(),
            None => match current() {
                Err(HostError::MissingAttribute { .. }) => {
                    debug!(library = self.name, "equals() missing, using legacy comparison");
                    let _ = self.method.set(EqualsMethod::Legacy);
                    legacy()
                }
                result => {
                    let _ = self.method.set(EqualsMethod::Current);
                    result
                }
            },
        }
    }
}

pub static POLARS_SERIES_EQUALS: EqualsProbe = EqualsProbe::new("polars.Series");
pub static POLARS_FRAME_EQUALS: EqualsProbe = EqualsProbe::new("polars.DataFrame");
