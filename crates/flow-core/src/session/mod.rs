//! Signed-in user session: profile model and persistence seam.

pub mod model;
pub mod store;

pub use model::{
    display_name_from_email, federated_user_id, local_user_id, Session, PLACEHOLDER_PICTURE_URL,
};
pub use store::SessionStore;
