mod week_planning_test;
