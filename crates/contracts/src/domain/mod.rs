pub mod a001_product_row;
pub mod a002_reference_entity;
