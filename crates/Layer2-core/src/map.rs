//! Event Map - 이벤트 이름 → detail 타입의 컴파일 타임 매핑
//!
//! 매핑은 마커 타입(`EventMap`)과 이벤트마다 하나의 키 타입(`EventType<M>`)으로
//! 표현됩니다. 런타임 표현은 없으며, 타입 있는 메서드가 받을 수 있는
//! 인자만 제한합니다.
//!
//! ## 사용법
//!
//! ```ignore
//! use typed_events::event_map;
//!
//! event_map! {
//!     /// libp2p 스타일 피어 이벤트
//!     pub struct PeerEvents {
//!         PeerConnect("peer:connect") => String,
//!         PeerDisconnect("peer:disconnect") => String,
//!     }
//! }
//!
//! let emitter = TypedEventEmitter::<PeerEvents>::new();
//! emitter.on(PeerConnect, |evt| {
//!     println!("connected: {:?}", evt.detail());
//!     Ok(())
//! });
//! ```

/// 선언된 이벤트 매핑 (마커 trait)
pub trait EventMap: 'static {}

/// 매핑 `M`에 속한 이벤트 키
///
/// 하나의 키 타입이 여러 매핑에 속할 수 있습니다.
pub trait EventType<M: EventMap>: Copy {
    /// 런타임 이벤트 이름
    const NAME: &'static str;

    /// 이 이름으로 전달되는 payload 타입
    type Detail: Send + Sync + 'static;

    fn name(self) -> &'static str {
        Self::NAME
    }
}

/// 이벤트 매핑과 키 타입들을 선언합니다.
///
/// `Key("name") => DetailType` 항목마다 zero-sized 키 타입 `Key`가 생성되고
/// `EventType<Map>`이 구현됩니다.
#[macro_export]
macro_rules! event_map {
    (
        $(#[$meta:meta])*
        $vis:vis struct $map:ident {
            $(
                $(#[$key_meta:meta])*
                $key:ident($name:literal) => $detail:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $map;

        impl $crate::EventMap for $map {}

        $(
            $(#[$key_meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            $vis struct $key;

            impl $crate::EventType<$map> for $key {
                const NAME: &'static str = $name;
                type Detail = $detail;
            }
        )*
    };
}
