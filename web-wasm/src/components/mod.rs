pub mod bakery_card;
pub mod bakery_list;
pub mod header;
pub mod map_view;
pub mod search_bar;
pub mod tag_filter;
