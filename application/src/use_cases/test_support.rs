//! Scripted port doubles shared by the use case tests.

use crate::ports::completion_backend::{
    BackendError, CompletionBackend, CompletionRequest, CompletionResponse,
};
use crate::ports::interaction::{ApprovalPort, InteractionError, UserReplyPort};
use crate::ports::page_bridge::{BridgeError, BridgeReply, FrameInfo, PageBridgePort, ToolListing};
use async_trait::async_trait;
use pagepilot_domain::{OriginKey, OutputItem, ToolDescriptor};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

pub(crate) fn respond(id: &str, output: Vec<OutputItem>) -> CompletionResponse {
    CompletionResponse::new(id, output)
}

pub(crate) fn call(id: &str, name: &str, arguments: &str) -> OutputItem {
    OutputItem::function_call(id, name, arguments)
}

// ==================== Page bridge ====================

/// Bridge with fixed frames, per-origin tool listings and per-tool replies.
///
/// Origins without a listing behave as unreachable.
pub(crate) struct ScriptedBridge {
    frames: Vec<FrameInfo>,
    frames_fail: bool,
    listings: Mutex<HashMap<OriginKey, Vec<ToolDescriptor>>>,
    replies: HashMap<String, Result<BridgeReply, BridgeError>>,
    /// Listing swapped in when the named tool runs
    transitions: HashMap<String, (OriginKey, Vec<ToolDescriptor>)>,
    executions: Mutex<Vec<(OriginKey, String, String)>>,
}

impl ScriptedBridge {
    pub(crate) fn new() -> Self {
        Self {
            frames: Vec::new(),
            frames_fail: false,
            listings: Mutex::new(HashMap::new()),
            replies: HashMap::new(),
            transitions: HashMap::new(),
            executions: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_frame(mut self, frame: FrameInfo) -> Self {
        self.frames.push(frame);
        self
    }

    pub(crate) fn with_failing_frames(mut self) -> Self {
        self.frames_fail = true;
        self
    }

    pub(crate) fn with_tools(self, origin: OriginKey, tools: Vec<ToolDescriptor>) -> Self {
        self.set_tools(origin, tools);
        self
    }

    pub(crate) fn with_reply(mut self, name: &str, reply: BridgeReply) -> Self {
        self.replies.insert(name.to_string(), Ok(reply));
        self
    }

    pub(crate) fn with_error(mut self, name: &str, error: BridgeError) -> Self {
        self.replies.insert(name.to_string(), Err(error));
        self
    }

    pub(crate) fn with_tools_after(
        mut self,
        name: &str,
        origin: OriginKey,
        tools: Vec<ToolDescriptor>,
    ) -> Self {
        self.transitions.insert(name.to_string(), (origin, tools));
        self
    }

    /// Change what an origin exposes, as a page would after a tool call.
    pub(crate) fn set_tools(&self, origin: OriginKey, tools: Vec<ToolDescriptor>) {
        self.listings.lock().unwrap().insert(origin, tools);
    }

    pub(crate) fn executions(&self) -> Vec<(OriginKey, String, String)> {
        self.executions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageBridgePort for ScriptedBridge {
    async fn frames(&self) -> Result<Vec<FrameInfo>, BridgeError> {
        if self.frames_fail {
            return Err(BridgeError::Transport("webNavigation unavailable".into()));
        }
        Ok(self.frames.clone())
    }

    async fn list_tools(&self, origin: OriginKey) -> Result<ToolListing, BridgeError> {
        self.listings
            .lock()
            .unwrap()
            .get(&origin)
            .cloned()
            .map(ToolListing::new)
            .ok_or(BridgeError::Unreachable(origin))
    }

    async fn execute_tool(
        &self,
        origin: OriginKey,
        name: &str,
        arguments: &str,
    ) -> Result<BridgeReply, BridgeError> {
        self.executions
            .lock()
            .unwrap()
            .push((origin, name.to_string(), arguments.to_string()));
        if let Some((changed, tools)) = self.transitions.get(name) {
            self.set_tools(*changed, tools.clone());
        }
        self.replies
            .get(name)
            .cloned()
            .unwrap_or_else(|| Ok(BridgeReply::err(format!("Tool not found: {}", name))))
    }
}

// ==================== Completion backend ====================

enum BackendScript {
    Responses(Mutex<VecDeque<Result<CompletionResponse, BackendError>>>),
    /// Cancel the token, then never answer
    CancelAndHang(CancellationToken),
}

/// Backend that replays scripted responses in order and records requests.
pub(crate) struct ScriptedBackend {
    script: BackendScript,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub(crate) fn new(responses: Vec<Result<CompletionResponse, BackendError>>) -> Self {
        Self {
            script: BackendScript::Responses(Mutex::new(responses.into())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Simulates the user cancelling while the request is outstanding.
    pub(crate) fn cancel_and_hang(token: CancellationToken) -> Self {
        Self {
            script: BackendScript::CancelAndHang(token),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, BackendError> {
        self.requests.lock().unwrap().push(request);
        match &self.script {
            BackendScript::Responses(queue) => {
                let next = queue.lock().unwrap().pop_front();
                next.unwrap_or_else(|| Err(BackendError::RequestFailed("(no more responses)".into())))
            }
            BackendScript::CancelAndHang(token) => {
                token.cancel();
                std::future::pending().await
            }
        }
    }
}

// ==================== Interaction ====================

/// Approval gate that replays scripted decisions and records what it was asked.
pub(crate) struct ScriptedApproval {
    decisions: Mutex<VecDeque<Result<bool, InteractionError>>>,
    asked: Mutex<Vec<(String, Value)>>,
    hang_with: Option<CancellationToken>,
}

impl ScriptedApproval {
    pub(crate) fn new(decisions: Vec<Result<bool, InteractionError>>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into()),
            asked: Mutex::new(Vec::new()),
            hang_with: None,
        }
    }

    /// Never resolves; cancels the token so the run can pre-empt it.
    pub(crate) fn cancel_and_hang(token: CancellationToken) -> Self {
        Self {
            hang_with: Some(token),
            ..Self::new(vec![])
        }
    }

    pub(crate) fn asked(&self) -> Vec<(String, Value)> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApprovalPort for ScriptedApproval {
    async fn request_approval(&self, tool_name: &str, args: &Value) -> Result<bool, InteractionError> {
        self.asked
            .lock()
            .unwrap()
            .push((tool_name.to_string(), args.clone()));
        if let Some(token) = &self.hang_with {
            token.cancel();
            return std::future::pending().await;
        }
        let next = self.decisions.lock().unwrap().pop_front();
        next.unwrap_or(Ok(true))
    }
}

/// User-reply collaborator that replays scripted answers.
pub(crate) struct ScriptedUserReply {
    replies: Mutex<VecDeque<Result<String, InteractionError>>>,
    questions: Mutex<Vec<String>>,
    hang_with: Option<CancellationToken>,
}

impl ScriptedUserReply {
    pub(crate) fn new(replies: Vec<Result<String, InteractionError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            questions: Mutex::new(Vec::new()),
            hang_with: None,
        }
    }

    /// Never answers; cancels the token so the run can pre-empt it.
    pub(crate) fn cancel_and_hang(token: CancellationToken) -> Self {
        Self {
            hang_with: Some(token),
            ..Self::new(vec![])
        }
    }

    pub(crate) fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserReplyPort for ScriptedUserReply {
    async fn ask(&self, question: &str) -> Result<String, InteractionError> {
        self.questions.lock().unwrap().push(question.to_string());
        if let Some(token) = &self.hang_with {
            token.cancel();
            return std::future::pending().await;
        }
        let next = self.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(String::new()))
    }
}
