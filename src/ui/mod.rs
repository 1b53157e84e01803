pub mod icons;
pub mod month_view;
pub mod palette;
