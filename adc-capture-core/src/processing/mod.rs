pub mod buffer;
pub mod chunk_reader;
pub mod pcm;
pub mod result_packer;
