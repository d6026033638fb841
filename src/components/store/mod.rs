mod actor;

pub use actor::{keys, StoreActor, StoreActorHandle};
