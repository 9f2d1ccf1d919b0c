//! エラー型の定義
//!
//! 辞書構築はオフラインのバッチ処理なので、エラーからの回復は行いません。
//! ライブラリは失敗を[`JitenError`]として呼び出し元へ伝搬し、CLIが診断
//! メッセージと共に非ゼロ終了します。
//!
//! バリアントは大きく3系統に分かれます:
//!
//! - 入力データの問題([`InvalidArgument`](JitenError::InvalidArgument))
//! - イメージやblobの破損([`InvalidFormat`](JitenError::InvalidFormat))
//! - 構築パスの事後条件違反([`InvalidState`](JitenError::InvalidState))。
//!   これはデータではなくプログラミングエラーを示します。

/// Jiten専用のResult型
pub type Result<T, E = JitenError> = std::result::Result<T, E>;

/// Jitenのエラー型
#[derive(Debug, thiserror::Error)]
pub enum JitenError {
    /// 呼び出し側が渡した入力が受理できない
    ///
    /// 空の読みを持つ語彙エントリなど、入力データそのものの問題です。
    /// `arg`は問題のあった引数名、`msg`はレコード位置を含む診断です。
    #[error("invalid argument ({arg}): {msg}")]
    InvalidArgument {
        /// 引数の名前
        arg: &'static str,
        /// 診断メッセージ
        msg: String,
    },

    /// バイト列が期待するレイアウトに従っていない
    ///
    /// 語彙ファイルの行や、辞書イメージ・品詞blobの復号時に検出された
    /// 破損です。`source_name`は枠組みやファイルの名前です。
    #[error("invalid format ({source_name}): {msg}")]
    InvalidFormat {
        /// 枠組みまたはファイルの名前
        source_name: &'static str,
        /// 診断メッセージ
        msg: String,
    },

    /// 構築パスの事後条件が破れた
    ///
    /// 頻出品詞表の個数不一致や、確定済みビルダーへの追加など。
    /// 入力を直しても解消しない、実装側の不変条件違反です。
    #[error("invalid state at {location}: {msg}")]
    InvalidState {
        /// 違反を検出した操作
        location: &'static str,
        /// 破れた条件の説明
        msg: String,
    },

    /// 出力ストリームや中間ファイルへの書き込み失敗
    ///
    /// 部分的に書かれた出力は破損とみなし、呼び出し側で破棄してください。
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// 数値がセクション長などの幅に収まらない
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// 語彙ファイルの数値フィールドが解析できない
    #[error(transparent)]
    ParseInt(#[from] std::num::ParseIntError),

    /// セクション名などがUTF-8として不正
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),
}

impl JitenError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument {
            arg,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_format<S>(source_name: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat {
            source_name,
            msg: msg.into(),
        }
    }

    pub(crate) fn invalid_state<S>(location: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidState {
            location,
            msg: msg.into(),
        }
    }
}
