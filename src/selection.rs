use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::models::{ChapterRecord, SearchResult};
use crate::utils::truncate_chars;

const ALT_TITLE_WIDTH: usize = 50;

/// 交互输入来源，返回 `None` 表示输入结束
pub trait InputSource {
    fn next_line(&mut self, prompt: &str) -> Option<String>;
}

/// 从终端读取
pub struct StdinInput;

impl InputSource for StdinInput {
    fn next_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok()?;
        read_choice(&mut io::stdin().lock())
    }
}

/// 读取一行；非 UTF-8 输入视为空行（重新提示），EOF 返回 `None`
fn read_choice<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => Some(String::new()),
        Err(_) => None,
    }
}

/// 预先写好的输入序列
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn next_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Picked(String),
    Quit,
}

pub fn render_results(results: &[SearchResult]) -> String {
    let mut out = String::from("\n=== Search Results ===\n");
    for (i, result) in results.iter().enumerate() {
        out.push_str(&format!("{:2}. {}\n", i + 1, result.display_title));
        let alt = result.alternate_titles.join(", ");
        let alt = truncate_chars(&alt, ALT_TITLE_WIDTH);
        if !alt.is_empty() {
            out.push_str(&format!("    └─ {}\n", alt));
        }
    }
    out
}

/// 解析 1 起始的序号
pub fn parse_choice(input: &str, len: usize) -> Result<usize> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("not a number: {:?}", input.trim())))?;
    if choice == 0 || choice > len {
        return Err(Error::InvalidInput(format!("{} is out of range", choice)));
    }
    Ok(choice - 1)
}

/// 列出搜索结果并等待选择，输入无效时一直重新提示
pub fn prompt_for_title(results: &[SearchResult], input: &mut dyn InputSource) -> Selection {
    println!("{}", render_results(results));

    loop {
        let Some(line) = input.next_line("Enter number (or 0 to quit): ") else {
            return Selection::Quit;
        };
        let choice = line.trim();
        if choice == "0" {
            return Selection::Quit;
        }

        match parse_choice(choice, results.len()) {
            Ok(idx) => return Selection::Picked(results[idx].id.clone()),
            Err(_) => println!("Invalid choice."),
        }
    }
}

/// 按范围表达式筛选章节。
///
/// `all` 返回全部章节；否则按逗号拆分，`a-b` 按字符串字典序取闭区间，
/// 其余按章节号精确匹配。多个片段重叠时结果不去重。
pub fn resolve_range(expression: &str, chapters: &[ChapterRecord]) -> Vec<ChapterRecord> {
    let expression = expression.trim();
    if expression == "all" {
        return chapters.to_vec();
    }

    let mut selected = Vec::new();
    for token in expression.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.contains('-') {
            let parts: Vec<&str> = token.split('-').map(str::trim).collect();
            let [start, end] = parts[..] else {
                continue;
            };
            selected.extend(
                chapters
                    .iter()
                    .filter(|c| {
                        let number = c.number_or_default();
                        start <= number && number <= end
                    })
                    .cloned(),
            );
        } else {
            selected.extend(
                chapters
                    .iter()
                    .filter(|c| c.chapter_number.as_deref() == Some(token))
                    .cloned(),
            );
        }
    }
    selected
}
