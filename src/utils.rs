/// 左侧补零到 `width` 位，保留开头的正负号
pub fn zero_pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let zeros = "0".repeat(width - len);
    match value.chars().next() {
        Some(sign @ ('+' | '-')) => format!("{}{}{}", sign, zeros, &value[1..]),
        _ => format!("{}{}", zeros, value),
    }
}

/// 替换文件名中不允许出现的字符
pub fn sanitize_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// 按字符截断，避免切在多字节字符中间
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
