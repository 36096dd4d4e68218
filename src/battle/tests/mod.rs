pub mod common;



#[cfg(test)]
mod test_items;





#[cfg(test)]
mod test_npc_npc_battle;
