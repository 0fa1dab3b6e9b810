pub mod aes;
pub mod nullcipher;
pub mod threefish256;
