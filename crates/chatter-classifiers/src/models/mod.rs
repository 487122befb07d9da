pub mod classifier_trait;
pub mod factory;
pub mod linear_svc;
pub mod weights;

pub use classifier_trait::ClassifierModel;
pub use weights::Weights;
