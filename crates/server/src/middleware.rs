use axum::{
    extract::{ConnectInfo, Request},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use tracing::info;

/// 简化版本的IP记录中间件，只记录IP和基本信息
pub async fn simple_ip_logger(ConnectInfo(addr): ConnectInfo<SocketAddr>, request: Request, next: Next) -> Response {
    let method = request.method();
    let path = request.uri().path();
    let client_ip = addr.ip();

    // 记录请求IP
    info!("📍 API请求 - IP: {} | {} {}", client_ip, method, path);

    // 处理请求
    next.run(request).await
}
