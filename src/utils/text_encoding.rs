use chardetng::EncodingDetector;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

/// 将任意字节解码为UTF-8字符串
///
/// 首先尝试直接作为UTF-8解析；失败时使用chardetng进行编码检测，
/// 再通过encoding_rs转换，无法映射的字节使用替换字符。历史导出
/// 文件常见 latin-1 / cp1252 等编码，均可被检测覆盖，因此解码
/// 总能产生字符串，不会使批处理中断。
pub fn decode_bytes(input: &[u8]) -> String {
    // 首先尝试直接作为UTF-8解析
    if let Ok(utf8_str) = std::str::from_utf8(input) {
        if contains_unicode_escapes(utf8_str) {
            return normalize_unicode(utf8_str);
        }
        return utf8_str.to_string();
    }

    // UTF-8解析失败，进行编码检测
    let mut detector = EncodingDetector::new();
    detector.feed(input, true);
    let encoding = detector.guess(None, true);

    debug!("检测到编码: {}", encoding.name());

    let (decoded, _, had_errors) = encoding.decode(input);
    if had_errors {
        warn!("编码转换存在替换字符, 编码: {}", encoding.name());
    }

    let result = decoded.into_owned();
    if contains_unicode_escapes(&result) {
        return normalize_unicode(&result);
    }

    result
}

static UNICODE_ESCAPE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})|\\x([0-9a-fA-F]{2})").unwrap());

/// 检测文本是否包含Unicode转义序列
fn contains_unicode_escapes(text: &str) -> bool {
    UNICODE_ESCAPE_REGEX.is_match(text)
}

/// 将字面的 `\uXXXX` / `\xXX` 转义序列还原为对应字符
///
/// 部分来源页面把非ASCII内容以转义序列形式嵌在文本里。
/// 无法映射为字符的码位原样保留。
fn normalize_unicode(text: &str) -> String {
    debug!("检测到Unicode转义序列，执行规范化转换");
    UNICODE_ESCAPE_REGEX
        .replace_all(text, |caps: &Captures| {
            let hex = caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str());
            hex.and_then(|h| u32::from_str_radix(h, 16).ok())
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
