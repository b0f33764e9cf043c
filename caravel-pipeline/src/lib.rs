pub mod driver;
pub mod params;
pub mod testing;

pub use driver::{generated_identity, PurchaseDriver, RunReport, Stage, StageError, StageFailure};
pub use params::{
    read_override, BasketParams, CardParams, DefaultParams, OverrideInput, ParamSource,
};
