mod entry_flow;
mod keyboard;
