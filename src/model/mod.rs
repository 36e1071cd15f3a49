//! Model training, evaluation and persistence components

pub mod forest;
pub mod store;
pub mod trainer;
pub mod tree;

pub use forest::RandomForest;
pub use store::{JsonModelStore, ModelStore};
pub use trainer::{ClassWeight, EvaluationReport, Hyperparameters, ModelTrainer, TrainedModel};
pub use tree::DecisionTree;
