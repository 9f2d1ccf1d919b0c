//! システム辞書のビルドモジュール
//!
//! このモジュールは、CSV形式の語彙ファイルからバイナリ形式のシステム辞書
//! イメージを構築する機能を提供します。

use std::fs::File;
use std::io;
use std::path::PathBuf;

use jiten::dictionary::lexicon;
use jiten::errors::JitenError;
use jiten::{BuilderOptions, SystemDictionaryBuilder};

use clap::Parser;

/// ビルドコマンドの引数
///
/// システム辞書をビルドするために必要な入力ファイルと出力先を指定します。
#[derive(Parser, Debug)]
#[clap(name = "build", about = "A program to build the system dictionary.")]
pub struct Args {
    /// Lexicon file (lexicon.csv).
    ///
    /// Each row is `reading,left_id,right_id,cost,surface[,attributes]`.
    #[clap(short = 'l', long)]
    lexicon_in: PathBuf,

    /// File to which the binary dictionary image is output.
    #[clap(short = 'o', long)]
    sysdic_out: PathBuf,

    /// Also write each section to a sibling file
    /// (`.value`, `.key`, `.tokens`, `.freq_pos`).
    #[clap(long)]
    preserve_intermediate_dictionary: bool,

    /// Minimum reading length (in characters) to use the one-byte cost
    /// encoding.
    #[clap(long, default_value_t = 6)]
    min_key_length_to_use_small_cost_encoding: usize,
}

/// ビルド処理中に発生する可能性のあるエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// 入出力エラー
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// 辞書構築エラー
    #[error("Dictionary building failed: {0}")]
    Jiten(#[from] JitenError),
}

/// ビルドコマンドを実行する
///
/// 語彙ファイルを読み込み、辞書を構築してバイナリイメージを出力します。
///
/// # 引数
///
/// * `args` - ビルドコマンドの引数
///
/// # エラー
///
/// ファイルの読み書きや辞書構築に失敗した場合、`BuildError`を返します。
pub fn run(args: Args) -> Result<(), BuildError> {
    println!("Reading the lexicon...");
    let tokens = lexicon::from_reader(File::open(&args.lexicon_in)?)?;
    println!("{} tokens loaded", tokens.len());

    println!("Compiling the system dictionary...");
    let mut builder = SystemDictionaryBuilder::with_options(BuilderOptions {
        preserve_intermediate_dictionary: args.preserve_intermediate_dictionary,
        min_key_length_to_use_small_cost_encoding: args
            .min_key_length_to_use_small_cost_encoding,
    });
    builder.build_from_tokens(&tokens)?;

    println!("Writing the system dictionary...");
    builder.write_to_file(&args.sysdic_out)?;

    println!(
        "Successfully built the dictionary to {}",
        args.sysdic_out.display()
    );
    Ok(())
}
