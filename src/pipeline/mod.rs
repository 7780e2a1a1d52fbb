mod client;
mod policy;
mod stage;

pub use client::{ActivityEntry, Client, StageChangeRequest};
pub use policy::{StageTransitionPolicy, TransitionClass};
pub use stage::Stage;
