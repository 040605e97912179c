//! 与外部批量翻译服务交互的流水线层

pub mod bhashini;
pub mod processor;
pub mod translate;
