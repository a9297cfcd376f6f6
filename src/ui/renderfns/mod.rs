pub mod footer;
pub mod header;
pub mod product_list;
pub mod utils;

pub use footer::draw_footer;
pub use header::draw_header;
pub use product_list::draw_product_list;
pub use utils::{format_date, format_price, rating_stars, stock_color, stock_label, truncate};
