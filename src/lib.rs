pub mod ray;
pub mod scene;
pub mod probe;
pub mod shapes;
pub mod numeric;
pub mod interval;
pub mod material;
pub mod json_structs;
pub mod json_parser;

pub mod prelude;
