//! Transport - ノード間バイナリ通信の契約
//!
//! 実際のルーティングやソケットは外部コラボレータの責務です。
//! ここにあるのは「名前」「バイナリ形式」「レスポンスの復元方法」だけです。

pub mod stream;
pub mod writeable;
pub mod action;
pub mod registry;

pub use self::stream::{BytesStreamInput, BytesStreamOutput, StreamError, StreamInput, StreamOutput};
pub use self::writeable::{Writeable, read_list, write_list};
pub use self::action::{ActionType, DynAction, Reader, TypedAction};
pub use self::registry::{ActionRegistry, RegistryError};
