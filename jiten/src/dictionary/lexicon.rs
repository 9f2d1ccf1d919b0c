//! テキスト語彙ファイルのローダー
//!
//! このモジュールは、CSV形式の語彙ファイルを[`Token`]の列へ解析します。
//! 1行の書式は以下の通りです:
//!
//! ```text
//! 読み,左品詞ID,右品詞ID,コスト,表層形[,属性ビット]
//! ```

use std::io::Read;

use csv_core::ReadFieldResult;

use crate::dictionary::Token;
use crate::errors::{JitenError, Result};

const MIN_FIELDS: usize = 5;
const MAX_FIELDS: usize = 6;

/// リーダーから語彙ファイルを読み込み、解析します。
///
/// # 引数
///
/// * `rdr` - 語彙ファイルのリーダー
///
/// # エラー
///
/// 読み込みまたは解析に失敗した場合にエラーを返します。
pub fn from_reader<R>(mut rdr: R) -> Result<Vec<Token>>
where
    R: Read,
{
    let mut buf = vec![];
    rdr.read_to_end(&mut buf)?;
    parse_csv(&buf, "lexicon.csv")
}

/// CSVバイト列を語彙エントリの列へ解析します。
///
/// # 引数
///
/// * `bytes` - 語彙ファイルの内容
/// * `name` - 診断メッセージに使うファイル名
///
/// # エラー
///
/// フィールド数や数値フィールドが不正な場合にエラーを返します。
pub fn parse_csv(mut bytes: &[u8], name: &'static str) -> Result<Vec<Token>> {
    let mut tokens = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut output = [0; 4096];
    let mut fields: Vec<String> = vec![];

    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        let (record_end, input_end) = match result {
            ReadFieldResult::InputEmpty => (true, true),
            ReadFieldResult::OutputFull => {
                return Err(JitenError::invalid_format(name, "field too large"));
            }
            ReadFieldResult::Field { record_end } => (record_end, false),
            ReadFieldResult::End => break,
        };
        fields.push(std::str::from_utf8(&output[..nout])?.to_string());
        if record_end {
            // A trailing newline yields one empty phantom field.
            if !(fields.len() == 1 && fields[0].is_empty()) {
                tokens.push(parse_record(&fields, name, tokens.len())?);
            }
            fields.clear();
        }
        bytes = &bytes[nin..];
        if input_end && bytes.is_empty() {
            break;
        }
    }
    Ok(tokens)
}

fn parse_record(fields: &[String], name: &'static str, record: usize) -> Result<Token> {
    if fields.len() < MIN_FIELDS || fields.len() > MAX_FIELDS {
        return Err(JitenError::invalid_format(
            name,
            format!(
                "record {record} has {} fields, expected {MIN_FIELDS} or {MAX_FIELDS}",
                fields.len()
            ),
        ));
    }
    let mut token = Token::new(
        fields[0].clone(),
        fields[4].clone(),
        fields[1].parse()?,
        fields[2].parse()?,
        fields[3].parse()?,
    );
    if let Some(attributes) = fields.get(5) {
        token.attributes = attributes.parse()?;
    }
    Ok(token)
}
