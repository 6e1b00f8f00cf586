//! SeaORM entity definitions
//!
//! These map the checklist tables to models.

pub mod entry;
pub mod item;
pub mod run;
pub mod section;
pub mod user;

// Re-export all entities
pub use entry::Entity as Entry;
pub use item::Entity as Item;
pub use run::Entity as Run;
pub use section::Entity as Section;
pub use user::Entity as User;

// Re-export active models for easy access
pub use entry::ActiveModel as EntryActive;
pub use item::ActiveModel as ItemActive;
pub use run::ActiveModel as RunActive;
pub use section::ActiveModel as SectionActive;
pub use user::ActiveModel as UserActive;
