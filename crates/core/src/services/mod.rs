//! Business logic services.

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

pub use comment::{CommentInput, CommentService};
pub use follow::FollowService;
pub use group::GroupService;
pub use post::{CreatePostInput, PostService, UpdatePostInput};
pub use user::{SignupInput, UserService};
