/// 文件载荷帧的起始标记。
pub const FILE_MARKER: &[u8] = b"__FILE__";

/// 文件名与文件内容之间的分隔符。
pub const NAME_SEPARATOR: &[u8] = b"#####";

/// 长度前缀的位宽。
/// 前缀是一个大端序 `u32`，因此占用图像最前面 32 个通道的最低有效位。
pub const LENGTH_PREFIX_BITS: usize = 32;

/// 每个像素使用的颜色通道数 (R, G, B)。Alpha 通道永远不会被修改。
pub const CHANNELS_USED: usize = 3;

/// 批量扫描时，解码文本的前多少个字符必须是可打印 ASCII 才会被视为文本。
pub const TEXT_PROBE_CHARS: usize = 10;

/// 批量隐写时默认的封面图像目录。
pub const DEFAULT_INPUT_DIR: &str = "input_images";

/// 批量隐写结果的默认输出目录。
pub const DEFAULT_OUTPUT_DIR: &str = "stego_output";

/// 扫描时恢复出的文件的默认保存目录。
pub const DEFAULT_EXTRACT_DIR: &str = "extracted_data";

/// 隐写图像文件名前缀。
pub const STEGO_PREFIX: &str = "stego_";

/// 恢复文件的文件名前缀。
pub const EXTRACTED_PREFIX: &str = "extracted_";
