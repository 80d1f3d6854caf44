mod catalog;
mod model;
mod traits;

pub use catalog::InMemoryAssetRepository;
pub use model::{Asset, AssetKind};
pub use traits::AssetRepositoryTrait;
