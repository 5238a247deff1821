pub mod div;
