// budget_api library crate
// 서버 바이너리(main.rs)와 통합 테스트/벤치마크가 공유하는 모듈
pub mod domains;
pub mod routes;
pub mod shared;
