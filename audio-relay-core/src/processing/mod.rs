pub mod circular_buffer;
pub mod levels;
pub mod pcm;
pub mod wav_format;
pub mod window;
