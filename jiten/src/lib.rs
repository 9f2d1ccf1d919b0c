//! # Jiten
//!
//! Jitenは、日本語入力メソッドエンジン向けのオフラインなシステム辞書
//! ビルダーです。
//!
//! ## 概要
//!
//! このライブラリは、語彙エントリ(読み・表層形・品詞ID・コスト)のフラットな
//! 列を、ランタイムが直接読むコンパクトな単一バイナリイメージへ変換します。
//! イメージは4つのセクションから構成されます:
//!
//! - **値トライ**: 表層形のLOUDS符号化トライ
//! - **キートライ**: 読みのLOUDS符号化トライ
//! - **トークン配列**: 読みごとの可変長トークンレコード
//! - **頻出品詞表**: 最頻の品詞対256スロット
//!
//! 構築は頻度駆動の符号化選択(頻出品詞のインターン、読み長条件付きの
//! 1バイトコスト、かな一致フラグ、直前一致の重複排除)を含む多段パスで、
//! ビットレイアウトはランタイムとの契約です。
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use jiten::dictionary::{SystemDictionaryBuilder, Token};
//!
//! let tokens = vec![
//!     Token::new("きょう", "今日", 10, 10, 3000),
//!     Token::new("きょう", "京", 20, 20, 4000),
//!     Token::new("きょう", "きょう", 10, 10, 4500),
//! ];
//!
//! let mut builder = SystemDictionaryBuilder::new();
//! builder.build_from_tokens(&tokens)?;
//!
//! let mut image = vec![];
//! builder.write_to_stream(None, &mut image)?;
//! assert!(!image.is_empty());
//! # Ok(())
//! # }
//! ```

/// 辞書データ構造とビルダー
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 簡潔データ構造のストレージ
pub mod storage;

/// かな変換ユーティリティ
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use dictionary::{BuilderOptions, SystemDictionaryBuilder, Token};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
