/*
 * Responsibility
 * - Handler から見える「認証済み主体」の型
 * - Authenticate stage が検証して RequestCtx に格納し、handler はこの型だけを受け取る
 */

/// Identity attached to an authenticated request. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: String,
    pub email: String,
}
