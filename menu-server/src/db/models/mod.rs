pub mod category;
pub mod dish;
pub mod localized;
pub mod serde_helpers;

pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use dish::{
    BadgeType, CategoryRef, DietaryInfo, Dish, DishCreate, DishImage, DishUpdate,
    MAX_SPICE_LEVEL, clamp_spice_level, normalize_compare_at_price,
};
pub use localized::{Locale, LocalizedText};
